//! Error types for scheduling operations.

use chrono::{DateTime, Utc};

use crate::db::error::RepositoryError;
use crate::propagation::PropagationError;

/// Result type for scheduling operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Error type for scheduling operations.
///
/// Failures never corrupt shared state: persistence only happens as the last
/// step of observation creation, after every check has passed.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// A conflict with an existing observation was detected at commit time.
    /// Retryable by requesting new windows.
    #[error("Requested window overlaps an existing observation on this station")]
    Overlap,

    /// No orbital elements are available for the satellite. Not retryable
    /// without an external data refresh.
    #[error("No orbital elements available for satellite")]
    NoElements,

    /// The satellite is below the horizon at a window boundary, usually a
    /// symptom of stale orbital elements or a scheduling race. Surfaced to
    /// the caller, never retried automatically.
    #[error("Negative elevation at {at}")]
    NegativeElevation { at: DateTime<Utc> },

    /// The requested window spans more than one physical pass. A caller
    /// error, always surfaced.
    #[error("Requested window is not contained within a single pass")]
    SinglePass,

    /// The request itself is malformed or cannot be served by this station
    /// and transmitter combination.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A propagation computation failed outside the benign pass-search path.
    #[error("Propagation error: {0}")]
    Propagation(#[from] PropagationError),

    /// The repository failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
