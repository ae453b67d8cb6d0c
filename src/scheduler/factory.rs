//! Validation and materialization of committed observations.
//!
//! The factory re-validates a chosen window against live constraints at
//! commit time and produces the final [`Observation`] value. Checks run in a
//! fixed order, cheapest first, and the first failure aborts:
//!
//! 1. overlap against the station's current scheduled intervals
//! 2. orbital elements availability
//! 3. look angles at the window boundaries and midpoint
//! 4. non-negative elevation at both boundaries
//! 5. single-pass containment
//!
//! Nothing here persists; the service layer saves the returned value while
//! holding the station's commit lock.

use chrono::{DateTime, Duration, Utc};

use crate::api::{
    Interval, Observation, Satellite, Station, TleSnapshot, Transmitter,
};
use crate::propagation::{PropagationError, Propagator};
use crate::scheduler::error::{ScheduleError, ScheduleResult};
use crate::scheduler::overlap;

/// Offset into the window from which a second rising pass is probed.
const SINGLE_PASS_PROBE_OFFSET_S: i64 = 60;

/// Validate a requested window and build the observation to persist.
///
/// # Arguments
/// * `station` - Station the observation is scheduled on
/// * `satellite` - Satellite being observed
/// * `transmitter` - Transmitter to receive
/// * `scheduled` - The station's *current* scheduled intervals, read under
///   the station's commit lock
/// * `tle` - Current orbital elements, if any
/// * `start`, `end` - Requested window boundaries
/// * `author` - User committing the observation
/// * `propagator` - Propagation collaborator
///
/// # Errors
/// * [`ScheduleError::Overlap`] - conflict with an existing observation
/// * [`ScheduleError::NoElements`] - no orbital elements available
/// * [`ScheduleError::NegativeElevation`] - satellite below the horizon at a
///   boundary
/// * [`ScheduleError::SinglePass`] - window spans more than one pass
/// * [`ScheduleError::InvalidRequest`] - empty window, or no station antenna
///   can work the transmitter
#[allow(clippy::too_many_arguments)]
pub fn build_observation(
    station: &Station,
    satellite: &Satellite,
    transmitter: &Transmitter,
    scheduled: &[Interval],
    tle: Option<&TleSnapshot>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    author: &str,
    propagator: &dyn Propagator,
) -> ScheduleResult<Observation> {
    let candidate = Interval::new(start, end).ok_or_else(|| {
        ScheduleError::InvalidRequest("observation window is empty or inverted".to_string())
    })?;

    let (_, overlapped) = overlap::resolve(scheduled, candidate);
    if overlapped {
        return Err(ScheduleError::Overlap);
    }

    let tle = tle.ok_or(ScheduleError::NoElements)?;

    let observer = &station.location;
    let altitude_start = propagator.altitude_at(observer, tle, start)?;
    let altitude_end = propagator.altitude_at(observer, tle, end)?;
    let rise_azimuth = propagator.azimuth_at(observer, tle, start)?;
    let set_azimuth = propagator.azimuth_at(observer, tle, end)?;
    let mid = start + candidate.duration() / 2;
    let max_altitude = propagator.altitude_at(observer, tle, mid)?;

    if altitude_start.value() < 0.0 {
        return Err(ScheduleError::NegativeElevation { at: start });
    }
    if altitude_end.value() < 0.0 {
        return Err(ScheduleError::NegativeElevation { at: end });
    }

    // The window must sit inside one physical pass: probing shortly after
    // the start must not find another pass rising before the end.
    let probe = start + Duration::seconds(SINGLE_PASS_PROBE_OFFSET_S);
    match propagator.next_pass(observer, station.min_horizon, tle, probe) {
        Ok(next) if next.rise_time < end => return Err(ScheduleError::SinglePass),
        Ok(_) | Err(PropagationError::NoPass) => {}
        Err(e) => return Err(ScheduleError::Propagation(e)),
    }

    let antenna = station.compatible_antenna(transmitter).ok_or_else(|| {
        ScheduleError::InvalidRequest(format!(
            "no antenna on station {} covers transmitter {}",
            station.id, transmitter.id
        ))
    })?;

    Ok(Observation {
        id: None,
        station_id: station.id,
        satellite_id: satellite.id,
        transmitter_id: transmitter.id,
        start,
        end,
        rise_azimuth,
        set_azimuth,
        max_altitude,
        tle: tle.clone(),
        transmitter_mode: transmitter.mode.clone(),
        transmitter_uplink: transmitter.uplink,
        transmitter_downlink: transmitter.downlink,
        antenna: antenna.clone(),
        author: author.to_string(),
        testing: station.testing,
    })
}
