//! Interface to the external orbital propagation collaborator.
//!
//! The scheduling core never computes orbital mechanics. Given a station
//! location and a satellite's orbital elements, the propagation collaborator
//! produces pass events and instantaneous look angles; this module defines
//! the trait the core consumes and nothing more. Implementations wrap
//! whatever propagation backend the deployment uses.

use chrono::{DateTime, Utc};
use qtty::Degrees;

use crate::api::{GeographicLocation, PassEvent, TleSnapshot};

/// Result type for propagation operations.
pub type PropagationResult<T> = Result<T, PropagationError>;

/// Error type for propagation operations.
#[derive(Debug, thiserror::Error)]
pub enum PropagationError {
    /// No further pass can be determined from the given cursor, e.g. the
    /// orbit has decayed or the satellite never rises over this horizon.
    /// Pass searches treat this as benign termination, not a failure.
    #[error("No pass found from the given time")]
    NoPass,

    /// The orbital elements could not be used for propagation.
    #[error("Invalid orbital elements: {0}")]
    InvalidElements(String),
}

/// Propagation operations the scheduling core depends on.
///
/// All calls are synchronous, bounded computations; they may be parallelized
/// across stations but are not expected to block on I/O.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so a single instance can be shared
/// across concurrent scheduling requests.
pub trait Propagator: Send + Sync {
    /// Predict the next pass of a satellite over an observer, searching
    /// forward from `cursor`.
    ///
    /// # Arguments
    /// * `observer` - Station location
    /// * `min_horizon` - Minimum elevation angle for rise/set
    /// * `tle` - Orbital elements to propagate
    /// * `cursor` - Instant to search forward from
    ///
    /// # Returns
    /// * `Ok(PassEvent)` - The next pass rising at or after `cursor`
    /// * `Err(PropagationError::NoPass)` - No pass can be determined
    fn next_pass(
        &self,
        observer: &GeographicLocation,
        min_horizon: Degrees,
        tle: &TleSnapshot,
        cursor: DateTime<Utc>,
    ) -> PropagationResult<PassEvent>;

    /// Satellite altitude above the observer's horizon at instant `t`,
    /// in degrees. Negative when the satellite is below the horizon.
    fn altitude_at(
        &self,
        observer: &GeographicLocation,
        tle: &TleSnapshot,
        t: DateTime<Utc>,
    ) -> PropagationResult<Degrees>;

    /// Satellite azimuth as seen from the observer at instant `t`, in
    /// degrees clockwise from north.
    fn azimuth_at(
        &self,
        observer: &GeographicLocation,
        tle: &TleSnapshot,
        t: DateTime<Utc>,
    ) -> PropagationResult<Degrees>;
}
