//! Observation-window construction for one predicted pass.
//!
//! Given a pass, the station's scheduled intervals, and an overlap policy,
//! this module produces zero or more [`ObservationWindow`] candidates.
//! Azimuth and altitude at trimmed boundaries are re-evaluated through the
//! propagator; the original pass's boundary values are only valid at the
//! original rise and set instants.

use chrono::{DateTime, Duration, Utc};
use qtty::Degrees;

use crate::api::{
    GeographicLocation, Interval, ObservationWindow, OverlapPolicy, PassEvent, TleSnapshot,
};
use crate::propagation::{PropagationResult, Propagator};
use crate::scheduler::overlap;

/// Maximum altitude within a window of the given pass.
///
/// A window whose boundaries do not coincide with the pass's time of closest
/// approach peaks at a boundary instead: entirely after tca, altitude peaks
/// at the window start; entirely before tca, at the window end; otherwise
/// the window contains tca and peaks there.
fn window_elev_max(
    propagator: &dyn Propagator,
    observer: &GeographicLocation,
    tle: &TleSnapshot,
    pass: &PassEvent,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> PropagationResult<Degrees> {
    if start > pass.tca_time {
        propagator.altitude_at(observer, tle, start)
    } else if end < pass.tca_time {
        propagator.altitude_at(observer, tle, end)
    } else {
        Ok(pass.tca_altitude)
    }
}

fn seconds(d: Duration) -> f64 {
    d.num_milliseconds() as f64 / 1000.0
}

/// Build observation-window candidates for one pass.
///
/// # Arguments
/// * `scheduled` - Intervals already scheduled on the station
/// * `policy` - How to handle conflicts with scheduled intervals
/// * `pass` - The predicted pass
/// * `observer` - Station location
/// * `tle` - Orbital elements the pass was predicted from
/// * `min_duration` - Minimum observation duration; shorter windows are
///   dropped (truncate) or flagged invalid (keep-full)
/// * `propagator` - Used to re-evaluate look angles at trimmed boundaries
///
/// # Returns
/// Zero or more windows. A conflict under the discard policy, or a pass
/// consumed entirely by scheduled observations, yields none.
#[allow(clippy::too_many_arguments)]
pub fn build_windows(
    scheduled: &[Interval],
    policy: OverlapPolicy,
    pass: &PassEvent,
    observer: &GeographicLocation,
    tle: &TleSnapshot,
    min_duration: Duration,
    propagator: &dyn Propagator,
) -> PropagationResult<Vec<ObservationWindow>> {
    let candidate = match pass.interval() {
        Some(candidate) => candidate,
        None => return Ok(Vec::new()),
    };

    let (sub_windows, overlapped) = overlap::resolve(scheduled, candidate);

    if !overlapped {
        if candidate.duration() <= min_duration {
            return Ok(Vec::new());
        }
        return Ok(vec![ObservationWindow {
            start: pass.rise_time,
            end: pass.set_time,
            az_start: pass.rise_azimuth,
            az_end: pass.set_azimuth,
            elev_max: pass.tca_altitude,
            tle: tle.clone(),
            valid_duration: true,
            overlapped: false,
            overlap_ratio: 0.0,
        }]);
    }

    let original = seconds(candidate.duration());

    match policy {
        OverlapPolicy::Discard => Ok(Vec::new()),
        OverlapPolicy::Truncate => {
            let mut windows = Vec::new();
            for w in &sub_windows {
                // Too-short sub-windows are dropped, never shrunk further.
                if w.duration() <= min_duration {
                    continue;
                }
                let az_start = propagator.azimuth_at(observer, tle, w.start)?;
                let az_end = propagator.azimuth_at(observer, tle, w.end)?;
                let elev_max =
                    window_elev_max(propagator, observer, tle, pass, w.start, w.end)?;
                let overlap_ratio =
                    (1.0 - seconds(w.duration()) / original).clamp(0.0, 1.0);

                windows.push(ObservationWindow {
                    start: w.start,
                    end: w.end,
                    az_start,
                    az_end,
                    elev_max,
                    tle: tle.clone(),
                    valid_duration: true,
                    overlapped: true,
                    overlap_ratio,
                });
            }
            Ok(windows)
        }
        OverlapPolicy::KeepFull => {
            let longest = sub_windows
                .iter()
                .map(|w| w.duration())
                .max()
                .unwrap_or_else(Duration::zero);
            let overlap_ratio = (1.0 - seconds(longest) / original).clamp(0.0, 1.0);
            let valid_duration = sub_windows.iter().all(|w| w.duration() > min_duration);
            let elev_max = window_elev_max(
                propagator,
                observer,
                tle,
                pass,
                pass.rise_time,
                pass.set_time,
            )?;

            Ok(vec![ObservationWindow {
                start: pass.rise_time,
                end: pass.set_time,
                az_start: pass.rise_azimuth,
                az_end: pass.set_azimuth,
                elev_max,
                tle: tle.clone(),
                valid_duration,
                overlapped: true,
                overlap_ratio,
            }])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::test_models::{test_location, test_tle, PassProfileModel};
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, s).unwrap()
    }

    fn iv(a: DateTime<Utc>, b: DateTime<Utc>) -> Interval {
        Interval::new(a, b).unwrap()
    }

    fn test_pass() -> PassEvent {
        PassEvent {
            rise_time: at(10, 0, 0),
            rise_azimuth: Degrees::new(20.0),
            tca_time: at(10, 5, 0),
            tca_altitude: Degrees::new(60.0),
            set_time: at(10, 10, 0),
            set_azimuth: Degrees::new(200.0),
        }
    }

    fn build(
        scheduled: &[Interval],
        policy: OverlapPolicy,
        min_duration_s: i64,
    ) -> Vec<ObservationWindow> {
        let pass = test_pass();
        let model = PassProfileModel::new(vec![pass.clone()]);
        build_windows(
            scheduled,
            policy,
            &pass,
            &test_location(),
            &test_tle(),
            Duration::seconds(min_duration_s),
            &model,
        )
        .unwrap()
    }

    #[test]
    fn conflict_free_pass_yields_one_full_window() {
        let windows = build(&[], OverlapPolicy::Truncate, 240);

        assert_eq!(windows.len(), 1);
        let w = &windows[0];
        assert_eq!(w.start, at(10, 0, 0));
        assert_eq!(w.end, at(10, 10, 0));
        assert_eq!(w.az_start, Degrees::new(20.0));
        assert_eq!(w.az_end, Degrees::new(200.0));
        assert_eq!(w.elev_max, Degrees::new(60.0));
        assert!(w.valid_duration);
        assert!(!w.overlapped);
        assert_eq!(w.overlap_ratio, 0.0);
    }

    #[test]
    fn conflict_free_pass_at_or_below_min_duration_is_dropped() {
        // Pass is exactly 10 minutes long.
        let windows = build(&[], OverlapPolicy::Truncate, 600);
        assert!(windows.is_empty());
    }

    #[test]
    fn five_minute_pass_clears_a_four_minute_minimum() {
        let pass = PassEvent {
            rise_time: at(10, 0, 0),
            rise_azimuth: Degrees::new(20.0),
            tca_time: at(10, 2, 30),
            tca_altitude: Degrees::new(35.0),
            set_time: at(10, 5, 0),
            set_azimuth: Degrees::new(200.0),
        };
        let model = PassProfileModel::new(vec![pass.clone()]);

        let windows = build_windows(
            &[],
            OverlapPolicy::Truncate,
            &pass,
            &test_location(),
            &test_tle(),
            Duration::minutes(4),
            &model,
        )
        .unwrap();

        assert_eq!(windows.len(), 1);
        let w = &windows[0];
        assert_eq!(w.start, at(10, 0, 0));
        assert_eq!(w.end, at(10, 5, 0));
        assert!(!w.overlapped);
        assert!(w.valid_duration);
    }

    #[test]
    fn discard_policy_drops_conflicting_pass() {
        let scheduled = vec![iv(at(10, 3, 0), at(10, 15, 0))];
        let windows = build(&scheduled, OverlapPolicy::Discard, 120);
        assert!(windows.is_empty());
    }

    #[test]
    fn truncate_reevaluates_boundaries() {
        // Conflict covers the tail of the pass from 10:03; the survivor is
        // [10:00, 10:02:30), entirely before tca.
        let scheduled = vec![iv(at(10, 3, 0), at(10, 15, 0))];
        let windows = build(&scheduled, OverlapPolicy::Truncate, 120);

        assert_eq!(windows.len(), 1);
        let w = &windows[0];
        assert_eq!(w.start, at(10, 0, 0));
        assert_eq!(w.end, at(10, 2, 30));
        assert!(w.overlapped);
        assert!(w.valid_duration);
        // Elevation peaks at the window end, not at rise or tca.
        assert_eq!(w.elev_max, Degrees::new(30.0));
        // Azimuth at the new end boundary, a quarter of the sweep in.
        assert_eq!(w.az_start, Degrees::new(20.0));
        assert_eq!(w.az_end, Degrees::new(65.0));
        // Lost 450 of 600 seconds.
        assert!((w.overlap_ratio - 0.75).abs() < 1e-9);
    }

    #[test]
    fn window_after_tca_peaks_at_window_start() {
        // Conflict covers the head of the pass until 10:06; the survivor
        // [10:06:30, 10:10) starts after tca.
        let scheduled = vec![iv(at(9, 55, 0), at(10, 6, 0))];
        let windows = build(&scheduled, OverlapPolicy::Truncate, 120);

        assert_eq!(windows.len(), 1);
        let w = &windows[0];
        assert_eq!(w.start, at(10, 6, 30));
        // Descending leg: 60 * (210 / 300).
        assert_eq!(w.elev_max, Degrees::new(42.0));
    }

    #[test]
    fn truncate_drops_too_short_sub_windows() {
        // Middle conflict leaves two 30-second fragments.
        let scheduled = vec![iv(at(10, 1, 0), at(10, 9, 0))];
        let windows = build(&scheduled, OverlapPolicy::Truncate, 120);
        assert!(windows.is_empty());
    }

    #[test]
    fn keep_full_spans_original_pass_and_reports_loss() {
        // Middle conflict [10:04, 10:06) leaves [10:00, 10:03:30) and
        // [10:06:30, 10:10), each 210 seconds.
        let scheduled = vec![iv(at(10, 4, 0), at(10, 6, 0))];
        let windows = build(&scheduled, OverlapPolicy::KeepFull, 120);

        assert_eq!(windows.len(), 1);
        let w = &windows[0];
        assert_eq!(w.start, at(10, 0, 0));
        assert_eq!(w.end, at(10, 10, 0));
        assert!(w.overlapped);
        assert!(w.valid_duration);
        // The window contains tca, so elevation peaks there.
        assert_eq!(w.elev_max, Degrees::new(60.0));
        // Longest usable sub-window is 210 of 600 seconds.
        assert!((w.overlap_ratio - 0.65).abs() < 1e-9);
    }

    #[test]
    fn keep_full_flags_invalid_when_fragments_are_short() {
        // Fragments of 30 seconds each, below the 120-second minimum.
        let scheduled = vec![iv(at(10, 1, 0), at(10, 9, 0))];
        let windows = build(&scheduled, OverlapPolicy::KeepFull, 120);

        assert_eq!(windows.len(), 1);
        let w = &windows[0];
        assert!(!w.valid_duration);
        assert!((w.overlap_ratio - 0.95).abs() < 1e-9);
    }

    #[test]
    fn keep_full_with_consumed_pass_reports_total_loss() {
        let scheduled = vec![iv(at(9, 55, 0), at(10, 15, 0))];
        let windows = build(&scheduled, OverlapPolicy::KeepFull, 120);

        assert_eq!(windows.len(), 1);
        let w = &windows[0];
        assert_eq!(w.overlap_ratio, 1.0);
        assert!(w.overlapped);
    }
}
