//! Pass search across a scheduling horizon.
//!
//! Drives the propagation collaborator from the start of the horizon,
//! collecting every pass that fits entirely inside it, and delegates each
//! pass to the window builder. A predictor that cannot resolve a next pass
//! (a decayed orbit, a satellite that never rises) terminates the search
//! without error; a partial result set is valid and expected.

use chrono::Duration;
use log::{debug, warn};
use qtty::Degrees;

use crate::api::{
    GeographicLocation, Interval, ObservationWindow, OverlapPolicy, PassEvent, TleSnapshot,
};
use crate::propagation::{PropagationError, PropagationResult, Propagator};
use crate::scheduler::window;

/// Collect all passes that fit entirely inside the search interval.
///
/// Passes shorter than `min_duration` are skipped but still advance the
/// cursor. The cursor steps to `set_time + step` after each found pass.
pub fn find_passes(
    propagator: &dyn Propagator,
    observer: &GeographicLocation,
    min_horizon: Degrees,
    tle: &TleSnapshot,
    search: Interval,
    min_duration: Duration,
    step: Duration,
) -> Vec<PassEvent> {
    let mut passes = Vec::new();
    let mut cursor = search.start;

    loop {
        let pass = match propagator.next_pass(observer, min_horizon, tle, cursor) {
            Ok(pass) => pass,
            Err(PropagationError::NoPass) => {
                debug!("pass search exhausted at {}", cursor);
                break;
            }
            Err(e) => {
                warn!("pass search terminated at {}: {}", cursor, e);
                break;
            }
        };

        // A pass must fit entirely inside the search horizon.
        if pass.rise_time >= search.end || pass.set_time > search.end {
            break;
        }

        let next_cursor = pass.set_time + step;
        if next_cursor <= cursor {
            // Non-advancing predictor; bail out rather than spin.
            warn!("pass search predictor did not advance past {}", cursor);
            break;
        }
        cursor = next_cursor;

        if pass.duration() < min_duration {
            continue;
        }
        passes.push(pass);
    }

    passes
}

/// Find all passes and candidate observation windows for a station and
/// satellite over the search interval.
///
/// # Returns
/// The predicted passes and the windows built from them against the
/// station's scheduled intervals.
#[allow(clippy::too_many_arguments)]
pub fn find_windows(
    propagator: &dyn Propagator,
    observer: &GeographicLocation,
    min_horizon: Degrees,
    tle: &TleSnapshot,
    scheduled: &[Interval],
    policy: OverlapPolicy,
    search: Interval,
    min_duration: Duration,
    step: Duration,
) -> PropagationResult<(Vec<PassEvent>, Vec<ObservationWindow>)> {
    let passes = find_passes(
        propagator,
        observer,
        min_horizon,
        tle,
        search,
        min_duration,
        step,
    );

    let mut windows = Vec::new();
    for pass in &passes {
        windows.extend(window::build_windows(
            scheduled,
            policy,
            pass,
            observer,
            tle,
            min_duration,
            propagator,
        )?);
    }

    Ok((passes, windows))
}
