//! Public API surface for the scheduling engine.
//!
//! This file consolidates the domain value types exchanged with callers and
//! collaborators. All types are plain value structs with no back-references,
//! and derive Serialize/Deserialize for JSON serialization. The scheduling
//! core owns no persistent state; it is handed these values per call and
//! returns new values.

use chrono::{DateTime, Duration, Utc};
use qtty::Degrees;
use serde::{Deserialize, Serialize};

/// Ground station identifier (database primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct StationId(pub i64);

/// Satellite identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SatelliteId(pub i64);

/// Transmitter identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransmitterId(pub i64);

/// Observation identifier.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ObservationId(pub i64);

impl StationId {
    pub fn new(value: i64) -> Self {
        StationId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl SatelliteId {
    pub fn new(value: i64) -> Self {
        SatelliteId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TransmitterId {
    pub fn new(value: i64) -> Self {
        TransmitterId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl ObservationId {
    pub fn new(value: i64) -> Self {
        ObservationId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for StationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for SatelliteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for TransmitterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for ObservationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Half-open time interval `[start, end)` in UTC.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Inclusive start instant
    pub start: DateTime<Utc>,
    /// Exclusive end instant
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Create an interval, rejecting empty or inverted bounds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Length of the interval.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Check if a given instant lies inside this interval (inclusive start,
    /// exclusive end).
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    /// Check if this interval overlaps with another (half-open semantics:
    /// touching endpoints do not overlap).
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check if `other` lies entirely within this interval.
    pub fn contains_interval(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Geographic location (latitude, longitude, elevation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeographicLocation {
    /// Latitude in decimal degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub longitude: f64,
    /// Elevation in meters above sea level (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_m: Option<f64>,
}

impl GeographicLocation {
    pub fn new(latitude: f64, longitude: f64, elevation_m: Option<f64>) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err("Latitude must be between -90 and 90 degrees".to_string());
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err("Longitude must be between -180 and 180 degrees".to_string());
        }
        Ok(Self {
            latitude,
            longitude,
            elevation_m,
        })
    }
}

/// Inclusive radio frequency range in Hz.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyRange {
    pub min_hz: u64,
    pub max_hz: u64,
}

impl FrequencyRange {
    pub fn new(min_hz: u64, max_hz: u64) -> Option<Self> {
        if min_hz <= max_hz {
            Some(Self { min_hz, max_hz })
        } else {
            None
        }
    }

    pub fn contains_hz(&self, freq_hz: u64) -> bool {
        self.min_hz <= freq_hz && freq_hz <= self.max_hz
    }
}

/// Station antenna with its supported frequency ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Antenna {
    /// Antenna type tag, e.g. "turnstile", "yagi", "dish"
    pub antenna_type: String,
    /// Band label, e.g. "VHF", "UHF"
    #[serde(default)]
    pub band: String,
    pub frequency_ranges: Vec<FrequencyRange>,
}

impl Antenna {
    /// Check whether any of this antenna's ranges covers the given frequency.
    pub fn supports_hz(&self, freq_hz: u64) -> bool {
        self.frequency_ranges.iter().any(|r| r.contains_hz(freq_hz))
    }
}

/// Operational state of a station.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationStatus {
    /// Not accepting observations.
    Offline,
    /// Operational, but results are not production quality yet.
    Testing,
    /// Fully operational.
    Online,
}

/// Ground station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub location: GeographicLocation,
    /// Minimum elevation angle above which the station can track a satellite.
    /// Used when the caller supplies no horizon override.
    pub min_horizon: Degrees,
    pub antennas: Vec<Antenna>,
    pub status: StationStatus,
    /// Observations on a testing station inherit this flag.
    #[serde(default)]
    pub testing: bool,
}

impl Station {
    /// First antenna able to work the given transmitter, judged by the
    /// transmitter's tracking frequency.
    pub fn compatible_antenna(&self, transmitter: &Transmitter) -> Option<&Antenna> {
        let freq = transmitter.tracking_frequency_hz()?;
        self.antennas.iter().find(|a| a.supports_hz(freq))
    }
}

/// Opaque snapshot of a satellite's orbital elements (two-line element set).
/// The core never parses these; they are handed verbatim to the propagation
/// collaborator and stamped onto observations for reproducibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TleSnapshot {
    pub tle0: String,
    pub tle1: String,
    pub tle2: String,
    pub updated: DateTime<Utc>,
}

/// Satellite in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Satellite {
    pub id: SatelliteId,
    pub norad_id: u32,
    pub name: String,
}

/// Satellite transmitter. Read-only input to scheduling; compatibility with a
/// station is derived from antenna frequency ranges, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transmitter {
    pub id: TransmitterId,
    pub satellite_id: SatelliteId,
    pub norad_id: u32,
    #[serde(default)]
    pub description: String,
    pub uplink: Option<FrequencyRange>,
    pub downlink: Option<FrequencyRange>,
    /// Modulation mode label, e.g. "CW", "BPSK"
    pub mode: Option<String>,
    pub baud: Option<f64>,
}

impl Transmitter {
    /// The frequency a station antenna must cover to work this transmitter:
    /// the downlink center when present, otherwise the uplink center.
    pub fn tracking_frequency_hz(&self) -> Option<u64> {
        self.downlink
            .or(self.uplink)
            .map(|r| r.min_hz + (r.max_hz - r.min_hz) / 2)
    }
}

/// One predicted satellite pass over one station, produced by the external
/// propagation collaborator. Ephemeral, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassEvent {
    pub rise_time: DateTime<Utc>,
    pub rise_azimuth: Degrees,
    /// Time of closest approach: the instant of maximum elevation.
    pub tca_time: DateTime<Utc>,
    pub tca_altitude: Degrees,
    pub set_time: DateTime<Utc>,
    pub set_azimuth: Degrees,
}

impl PassEvent {
    /// The pass as a half-open interval `[rise, set)`.
    pub fn interval(&self) -> Option<Interval> {
        Interval::new(self.rise_time, self.set_time)
    }

    pub fn duration(&self) -> Duration {
        self.set_time - self.rise_time
    }
}

/// Strategy for handling a predicted pass that conflicts with already
/// scheduled observations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Drop the pass entirely on any conflict.
    Discard,
    /// Keep the conflict-free sub-windows, trimmed with a guard gap.
    Truncate,
    /// Keep the full pass, marked as overlapped.
    KeepFull,
}

impl std::str::FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "discard" => Ok(Self::Discard),
            "truncate" => Ok(Self::Truncate),
            "keepfull" | "keep_full" => Ok(Self::KeepFull),
            other => Err(format!(
                "Unknown overlap policy '{}'. Use discard, truncate, or keepfull.",
                other
            )),
        }
    }
}

/// A candidate observation window produced by the scheduler for one pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub az_start: Degrees,
    pub az_end: Degrees,
    pub elev_max: Degrees,
    /// Orbital elements the window was computed from.
    pub tle: TleSnapshot,
    /// False when the window is shorter than the minimum observation duration.
    pub valid_duration: bool,
    pub overlapped: bool,
    /// Fraction of the original pass duration lost to conflict resolution,
    /// in `[0, 1]`. Zero means no loss.
    pub overlap_ratio: f64,
}

impl ObservationWindow {
    pub fn interval(&self) -> Option<Interval> {
        Interval::new(self.start, self.end)
    }
}

/// A committed observation. Created only through the observation factory;
/// once persisted it participates in overlap resolution as a
/// [`ScheduledObservation`]. Deleting it frees the interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Server-assigned on persist
    #[serde(default)]
    pub id: Option<ObservationId>,
    pub station_id: StationId,
    pub satellite_id: SatelliteId,
    pub transmitter_id: TransmitterId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub rise_azimuth: Degrees,
    pub set_azimuth: Degrees,
    pub max_altitude: Degrees,
    pub tle: TleSnapshot,
    /// Transmitter metadata snapshotted at creation time
    pub transmitter_mode: Option<String>,
    pub transmitter_uplink: Option<FrequencyRange>,
    pub transmitter_downlink: Option<FrequencyRange>,
    /// The station antenna selected for this observation
    pub antenna: Antenna,
    pub author: String,
    /// Inherited from the station
    pub testing: bool,
}

impl Observation {
    pub fn interval(&self) -> Option<Interval> {
        Interval::new(self.start, self.end)
    }
}

/// The conflict-relevant projection of a persisted observation: just the
/// station and its occupied interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledObservation {
    pub id: ObservationId,
    pub station_id: StationId,
    pub interval: Interval,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(min: i64, sec: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
            + Duration::minutes(min)
            + Duration::seconds(sec)
    }

    #[test]
    fn interval_rejects_empty_and_inverted() {
        assert!(Interval::new(t(0, 0), t(0, 0)).is_none());
        assert!(Interval::new(t(5, 0), t(0, 0)).is_none());
        assert!(Interval::new(t(0, 0), t(5, 0)).is_some());
    }

    #[test]
    fn interval_contains_is_half_open() {
        let iv = Interval::new(t(0, 0), t(10, 0)).unwrap();
        assert!(iv.contains(t(0, 0)));
        assert!(iv.contains(t(9, 59)));
        assert!(!iv.contains(t(10, 0)));
    }

    #[test]
    fn interval_overlap_excludes_touching() {
        let a = Interval::new(t(0, 0), t(10, 0)).unwrap();
        let b = Interval::new(t(10, 0), t(20, 0)).unwrap();
        let c = Interval::new(t(9, 0), t(11, 0)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn interval_containment() {
        let outer = Interval::new(t(0, 0), t(30, 0)).unwrap();
        let inner = Interval::new(t(5, 0), t(25, 0)).unwrap();
        assert!(outer.contains_interval(&inner));
        assert!(!inner.contains_interval(&outer));
        assert!(outer.contains_interval(&outer));
    }

    #[test]
    fn frequency_range_bounds_are_inclusive() {
        let range = FrequencyRange::new(435_000_000, 438_000_000).unwrap();
        assert!(range.contains_hz(435_000_000));
        assert!(range.contains_hz(438_000_000));
        assert!(!range.contains_hz(434_999_999));
        assert!(FrequencyRange::new(2, 1).is_none());
    }

    #[test]
    fn antenna_supports_any_of_its_ranges() {
        let antenna = Antenna {
            antenna_type: "turnstile".to_string(),
            band: "UHF".to_string(),
            frequency_ranges: vec![
                FrequencyRange::new(144_000_000, 146_000_000).unwrap(),
                FrequencyRange::new(435_000_000, 438_000_000).unwrap(),
            ],
        };
        assert!(antenna.supports_hz(145_800_000));
        assert!(antenna.supports_hz(436_500_000));
        assert!(!antenna.supports_hz(1_200_000_000));
    }

    #[test]
    fn tracking_frequency_prefers_downlink() {
        let tx = Transmitter {
            id: TransmitterId::new(1),
            satellite_id: SatelliteId::new(1),
            norad_id: 25544,
            description: String::new(),
            uplink: FrequencyRange::new(145_000_000, 145_000_000),
            downlink: FrequencyRange::new(437_000_000, 437_000_000),
            mode: None,
            baud: None,
        };
        assert_eq!(tx.tracking_frequency_hz(), Some(437_000_000));
    }

    #[test]
    fn overlap_policy_from_str() {
        use std::str::FromStr;
        assert_eq!(
            OverlapPolicy::from_str("truncate").unwrap(),
            OverlapPolicy::Truncate
        );
        assert_eq!(
            OverlapPolicy::from_str("keep_full").unwrap(),
            OverlapPolicy::KeepFull
        );
        assert_eq!(
            OverlapPolicy::from_str("DISCARD").unwrap(),
            OverlapPolicy::Discard
        );
        assert!(OverlapPolicy::from_str("merge").is_err());
    }

    #[test]
    fn geographic_location_validates_ranges() {
        assert!(GeographicLocation::new(91.0, 0.0, None).is_err());
        assert!(GeographicLocation::new(0.0, -181.0, None).is_err());
        assert!(GeographicLocation::new(52.5, 13.4, Some(34.0)).is_ok());
    }

    #[test]
    fn observation_window_round_trips_through_json() {
        let window = ObservationWindow {
            start: t(0, 0),
            end: t(8, 0),
            az_start: qtty::Degrees::new(20.0),
            az_end: qtty::Degrees::new(200.0),
            elev_max: qtty::Degrees::new(60.0),
            tle: TleSnapshot {
                tle0: "TEST".to_string(),
                tle1: "1".to_string(),
                tle2: "2".to_string(),
                updated: t(0, 0),
            },
            valid_duration: true,
            overlapped: false,
            overlap_ratio: 0.0,
        };

        let json = serde_json::to_string(&window).unwrap();
        let back: ObservationWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(back.start, window.start);
        assert_eq!(back.elev_max, window.elev_max);
        assert_eq!(back.overlap_ratio, window.overlap_ratio);
    }
}
