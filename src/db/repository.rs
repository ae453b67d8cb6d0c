//! Repository trait for abstracting persistence operations.
//!
//! This trait defines the interface the scheduling engine needs from
//! storage, allowing different implementations (a relational database, an
//! in-memory store for tests) to be swapped via dependency injection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::api::{
    Observation, ObservationId, Satellite, SatelliteId, ScheduledObservation, Station, StationId,
    TleSnapshot, Transmitter, TransmitterId,
};
use crate::db::error::RepositoryResult;

/// Persistence operations needed by the scheduling engine.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust and allow
/// sharing across threads.
///
/// # Error Handling
/// All methods return `RepositoryResult<T>` which wraps either the expected
/// return type or a `RepositoryError` describing what went wrong.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Check if the backing store is reachable and healthy.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Fetch a station by id.
    ///
    /// # Returns
    /// * `Ok(Station)` - The station with its antennas
    /// * `Err(RepositoryError::NotFound)` - If no such station exists
    async fn station(&self, id: StationId) -> RepositoryResult<Station>;

    /// Fetch a satellite by id.
    async fn satellite(&self, id: SatelliteId) -> RepositoryResult<Satellite>;

    /// Fetch a transmitter by id.
    async fn transmitter(&self, id: TransmitterId) -> RepositoryResult<Transmitter>;

    /// Latest known orbital elements for a satellite, if any.
    async fn latest_tle(&self, satellite_id: SatelliteId) -> RepositoryResult<Option<TleSnapshot>>;

    /// The station's scheduled observations whose interval ends at or after
    /// the given instant, i.e. everything still relevant for conflict
    /// checks. An observation ending exactly at `after` still counts:
    /// overlap resolution treats a touching boundary as a conflict.
    async fn scheduled_observations_for(
        &self,
        station_id: StationId,
        after: DateTime<Utc>,
    ) -> RepositoryResult<Vec<ScheduledObservation>>;

    /// Persist a new observation and return its assigned id.
    ///
    /// Implementations must reject an observation whose interval overlaps an
    /// existing one on the same station; the caller is expected to have
    /// already re-checked under the station's commit lock, so a rejection
    /// here indicates a bug or a bypassed lock.
    async fn save_observation(&self, observation: &Observation)
        -> RepositoryResult<ObservationId>;

    /// Delete an observation, freeing its interval for future scheduling.
    async fn delete_observation(&self, id: ObservationId) -> RepositoryResult<()>;
}
