//! Overlap resolution between a candidate interval and scheduled intervals.
//!
//! Given the intervals already scheduled on a station and a candidate
//! interval (usually a predicted pass), resolution produces the usable
//! sub-intervals plus a flag recording whether any conflict was found.
//! Trimmed boundaries keep a fixed 30-second guard gap to an existing
//! observation so that no window abuts a scheduled one with zero margin.
//!
//! The resolution is a pure recursive function over immutable inputs.
//! Callers supply scheduled intervals for one station only; intervals are
//! processed in the order supplied, and correctness does not depend on that
//! order.

use chrono::Duration;

use crate::api::Interval;

/// Fixed buffer between a trimmed window and an existing scheduled
/// observation, in seconds. Not configurable; trimmed boundaries are part of
/// the network's scheduling contract.
pub const GUARD_GAP_S: i64 = 30;

fn guard_gap() -> Duration {
    Duration::seconds(GUARD_GAP_S)
}

type Bounds = (chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>);

/// Outcome of resolving one candidate against one conflicting interval.
/// Bounds are raw because a trim or split can produce an empty or inverted
/// range; [`resolve`] validates before continuing.
#[derive(Debug, Clone, PartialEq)]
enum Resolution {
    /// Candidate fully consumed by the conflict.
    Consumed,
    /// Candidate shrunk from one side; scanning continues.
    Trimmed(Bounds),
    /// Candidate split around the conflict into two sub-problems.
    Split(Bounds, Bounds),
}

/// Classify how the scheduled interval `s` cuts into the candidate.
fn classify(s: &Interval, candidate: &Interval) -> Option<Resolution> {
    // Closed-bounds intersection test: a candidate touching a scheduled
    // interval at a single instant still counts as a conflict.
    if !(s.start <= candidate.end && candidate.start <= s.end) {
        return None;
    }

    if s.start <= candidate.start && s.end >= candidate.end {
        return Some(Resolution::Consumed);
    }

    if candidate.start < s.start && candidate.end > s.end {
        let left = (candidate.start, s.start - guard_gap());
        let right = (s.end + guard_gap(), candidate.end);
        return Some(Resolution::Split(left, right));
    }

    if s.start <= candidate.start {
        // Conflict covers the left edge: advance the start.
        Some(Resolution::Trimmed((s.end + guard_gap(), candidate.end)))
    } else {
        // Conflict covers the right edge: retreat the end.
        Some(Resolution::Trimmed((candidate.start, s.start - guard_gap())))
    }
}

/// Reconcile a candidate interval against the intervals already scheduled on
/// a station.
///
/// Returns the usable sub-intervals and whether any conflict occurred:
/// - no conflict: `([candidate], false)`
/// - candidate fully contained by a scheduled interval: `([], true)`
/// - conflict at one edge: `([trimmed], true)`
/// - conflict in the middle: `([left, right], true)`
///
/// A shrink that empties or inverts the candidate yields no window. Every
/// returned window is disjoint from every scheduled interval, and trimmed
/// boundaries are separated from the conflicting interval by the 30-second
/// guard gap.
pub fn resolve(scheduled: &[Interval], candidate: Interval) -> (Vec<Interval>, bool) {
    let mut current = candidate;
    let mut overlapped = false;

    for s in scheduled {
        match classify(s, &current) {
            None => continue,
            Some(Resolution::Consumed) => return (Vec::new(), true),
            Some(Resolution::Split((ls, le), (rs, re))) => {
                let mut windows = Vec::new();
                if let Some(left) = Interval::new(ls, le) {
                    windows.extend(resolve(scheduled, left).0);
                }
                if let Some(right) = Interval::new(rs, re) {
                    windows.extend(resolve(scheduled, right).0);
                }
                return (windows, true);
            }
            Some(Resolution::Trimmed((ts, te))) => {
                overlapped = true;
                match Interval::new(ts, te) {
                    Some(trimmed) => current = trimmed,
                    // Shrunk to nothing.
                    None => return (Vec::new(), true),
                }
            }
        }
    }

    (vec![current], overlapped)
}
