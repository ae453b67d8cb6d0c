//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use qtty::Degrees;
use std::sync::Arc;

use passplan::api::{
    Antenna, FrequencyRange, GeographicLocation, PassEvent, Satellite, SatelliteId, Station,
    StationId, StationStatus, TleSnapshot, Transmitter, TransmitterId,
};
use passplan::config::SchedulerConfig;
use passplan::db::LocalRepository;
use passplan::propagation::{PropagationError, PropagationResult, Propagator};
use passplan::services::SchedulingService;

pub const STATION: StationId = StationId(1);
pub const SATELLITE: SatelliteId = SatelliteId(1);
pub const TRANSMITTER: TransmitterId = TransmitterId(1);

/// Instant on the fixed test day.
pub fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, h, m, s).unwrap()
}

/// Deterministic propagator serving a fixed list of passes in time order.
///
/// Within a pass, altitude follows a triangular profile from zero at rise up
/// to the tca altitude and back to zero at set; azimuth sweeps linearly.
/// Outside every pass the satellite sits at -10 degrees.
pub struct FakePropagator {
    pub passes: Vec<PassEvent>,
}

impl FakePropagator {
    pub fn new(passes: Vec<PassEvent>) -> Self {
        Self { passes }
    }

    fn pass_at(&self, t: DateTime<Utc>) -> Option<&PassEvent> {
        self.passes
            .iter()
            .find(|p| p.rise_time <= t && t <= p.set_time)
    }
}

fn seconds(d: Duration) -> f64 {
    d.num_milliseconds() as f64 / 1000.0
}

impl Propagator for FakePropagator {
    fn next_pass(
        &self,
        _observer: &GeographicLocation,
        _min_horizon: Degrees,
        _tle: &TleSnapshot,
        cursor: DateTime<Utc>,
    ) -> PropagationResult<PassEvent> {
        self.passes
            .iter()
            .find(|p| p.rise_time >= cursor)
            .cloned()
            .ok_or(PropagationError::NoPass)
    }

    fn altitude_at(
        &self,
        _observer: &GeographicLocation,
        _tle: &TleSnapshot,
        t: DateTime<Utc>,
    ) -> PropagationResult<Degrees> {
        let Some(p) = self.pass_at(t) else {
            return Ok(Degrees::new(-10.0));
        };
        let peak = p.tca_altitude.value();
        let alt = if t <= p.tca_time {
            peak * seconds(t - p.rise_time) / seconds(p.tca_time - p.rise_time)
        } else {
            peak * seconds(p.set_time - t) / seconds(p.set_time - p.tca_time)
        };
        Ok(Degrees::new(alt))
    }

    fn azimuth_at(
        &self,
        _observer: &GeographicLocation,
        _tle: &TleSnapshot,
        t: DateTime<Utc>,
    ) -> PropagationResult<Degrees> {
        let Some(p) = self.pass_at(t) else {
            return Ok(Degrees::new(0.0));
        };
        let frac = seconds(t - p.rise_time) / seconds(p.set_time - p.rise_time);
        let az = p.rise_azimuth.value() + (p.set_azimuth.value() - p.rise_azimuth.value()) * frac;
        Ok(Degrees::new(az))
    }
}

/// A pass with a symmetric profile peaking at the given altitude.
pub fn symmetric_pass(rise: DateTime<Utc>, set: DateTime<Utc>, peak_deg: f64) -> PassEvent {
    PassEvent {
        rise_time: rise,
        rise_azimuth: Degrees::new(20.0),
        tca_time: rise + (set - rise) / 2,
        tca_altitude: Degrees::new(peak_deg),
        set_time: set,
        set_azimuth: Degrees::new(200.0),
    }
}

pub fn test_station() -> Station {
    Station {
        id: STATION,
        name: "Integration Test Station".to_string(),
        location: GeographicLocation::new(52.4, 13.1, Some(80.0)).unwrap(),
        min_horizon: Degrees::new(10.0),
        antennas: vec![Antenna {
            antenna_type: "turnstile".to_string(),
            band: "UHF".to_string(),
            frequency_ranges: vec![FrequencyRange::new(430_000_000, 440_000_000).unwrap()],
        }],
        status: StationStatus::Online,
        testing: false,
    }
}

pub fn test_satellite() -> Satellite {
    Satellite {
        id: SATELLITE,
        norad_id: 39412,
        name: "CUBEBUG-2".to_string(),
    }
}

pub fn test_transmitter() -> Transmitter {
    Transmitter {
        id: TRANSMITTER,
        satellite_id: SATELLITE,
        norad_id: 39412,
        description: "Telemetry".to_string(),
        uplink: None,
        downlink: FrequencyRange::new(437_445_000, 437_445_000),
        mode: Some("CW".to_string()),
        baud: None,
    }
}

pub fn test_tle() -> TleSnapshot {
    TleSnapshot {
        tle0: "CUBEBUG-2".to_string(),
        tle1: "1 39412U 13066AA  24060.50000000  .00002182  00000-0  28031-3 0  9995"
            .to_string(),
        tle2: "2 39412  97.7813 330.3585 0032135 342.1769  17.8313 14.81722674550652"
            .to_string(),
        updated: at(0, 0, 0),
    }
}

/// Repository seeded with the standard station, satellite, transmitter, and
/// orbital elements.
pub fn seeded_repository() -> LocalRepository {
    let repo = LocalRepository::new();
    repo.store_station_impl(test_station());
    repo.store_satellite_impl(test_satellite());
    repo.store_transmitter_impl(test_transmitter());
    repo.store_tle_impl(SATELLITE, test_tle());
    repo
}

/// Service over the given repository and pass table, with a 2-minute minimum
/// observation duration.
pub fn service(repo: LocalRepository, passes: Vec<PassEvent>) -> SchedulingService {
    let config = SchedulerConfig {
        min_observation_duration_s: 120,
        ..Default::default()
    };
    SchedulingService::new(
        Arc::new(repo),
        Arc::new(FakePropagator::new(passes)),
        config,
    )
}
