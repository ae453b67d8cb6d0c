//! Shared propagator fakes for scheduler unit tests.

use chrono::{DateTime, Duration, Utc};
use qtty::Degrees;

use crate::api::{GeographicLocation, PassEvent, TleSnapshot};
use crate::propagation::{PropagationError, PropagationResult, Propagator};

fn seconds(d: Duration) -> f64 {
    d.num_milliseconds() as f64 / 1000.0
}

/// Deterministic propagator serving a fixed list of passes in time order.
///
/// Within a pass, altitude follows a triangular profile rising from zero at
/// rise to the tca altitude and back to zero at set, and azimuth sweeps
/// linearly from the rise azimuth to the set azimuth. Outside every pass the
/// satellite sits at -10 degrees.
pub struct PassProfileModel {
    pub passes: Vec<PassEvent>,
}

impl PassProfileModel {
    pub fn new(passes: Vec<PassEvent>) -> Self {
        Self { passes }
    }

    fn pass_at(&self, t: DateTime<Utc>) -> Option<&PassEvent> {
        self.passes
            .iter()
            .find(|p| p.rise_time <= t && t <= p.set_time)
    }
}

impl Propagator for PassProfileModel {
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

pub fn test_tle() -> TleSnapshot {
    TleSnapshot {
        tle0: "CUBEBUG-2".to_string(),
        tle1: "1 39412U 13066AA  24060.50000000  .00002182  00000-0  28031-3 0  9995"
            .to_string(),
        tle2: "2 39412  97.7813 330.3585 0032135 342.1769  17.8313 14.81722674550652"
            .to_string(),
        updated: Utc::now(),
    }
}

pub fn test_location() -> GeographicLocation {
    GeographicLocation::new(52.4, 13.1, Some(80.0)).unwrap()
}
