//! In-memory local repository implementation.
//!
//! This module provides a local implementation of the repository trait
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMap structures, providing fast, deterministic, and
//! isolated execution.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{
    Observation, ObservationId, Satellite, SatelliteId, ScheduledObservation, Station, StationId,
    TleSnapshot, Transmitter, TransmitterId,
};
use crate::db::error::{RepositoryError, RepositoryResult};
use crate::db::repository::ScheduleRepository;

/// In-memory local repository.
///
/// Cloning is cheap and clones share the same underlying store, matching the
/// `Arc<dyn ScheduleRepository>` usage of real backends.
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Default)]
struct LocalData {
    stations: HashMap<StationId, Station>,
    satellites: HashMap<SatelliteId, Satellite>,
    transmitters: HashMap<TransmitterId, Transmitter>,
    tles: HashMap<SatelliteId, TleSnapshot>,
    observations: HashMap<ObservationId, Observation>,
    next_observation_id: i64,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a station. Helper for setting up test and development data.
    pub fn store_station_impl(&self, station: Station) {
        self.data.write().stations.insert(station.id, station);
    }

    /// Seed a satellite.
    pub fn store_satellite_impl(&self, satellite: Satellite) {
        self.data.write().satellites.insert(satellite.id, satellite);
    }

    /// Seed a transmitter.
    pub fn store_transmitter_impl(&self, transmitter: Transmitter) {
        self.data
            .write()
            .transmitters
            .insert(transmitter.id, transmitter);
    }

    /// Seed orbital elements for a satellite, replacing any previous set.
    pub fn store_tle_impl(&self, satellite_id: SatelliteId, tle: TleSnapshot) {
        self.data.write().tles.insert(satellite_id, tle);
    }

    /// Number of stored observations, for test assertions.
    pub fn observation_count(&self) -> usize {
        self.data.read().observations.len()
    }
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn station(&self, id: StationId) -> RepositoryResult<Station> {
        self.data
            .read()
            .stations
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("station {}", id)))
    }

    async fn satellite(&self, id: SatelliteId) -> RepositoryResult<Satellite> {
        self.data
            .read()
            .satellites
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("satellite {}", id)))
    }

    async fn transmitter(&self, id: TransmitterId) -> RepositoryResult<Transmitter> {
        self.data
            .read()
            .transmitters
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("transmitter {}", id)))
    }

    async fn latest_tle(&self, satellite_id: SatelliteId) -> RepositoryResult<Option<TleSnapshot>> {
        Ok(self.data.read().tles.get(&satellite_id).cloned())
    }

    async fn scheduled_observations_for(
        &self,
        station_id: StationId,
        after: DateTime<Utc>,
    ) -> RepositoryResult<Vec<ScheduledObservation>> {
        let data = self.data.read();
        let mut scheduled: Vec<ScheduledObservation> = data
            .observations
            .values()
            .filter(|o| o.station_id == station_id && o.end >= after)
            .filter_map(|o| {
                let interval = o.interval()?;
                Some(ScheduledObservation {
                    id: o.id?,
                    station_id: o.station_id,
                    interval,
                })
            })
            .collect();
        scheduled.sort_by_key(|s| s.interval.start);
        Ok(scheduled)
    }

    async fn save_observation(
        &self,
        observation: &Observation,
    ) -> RepositoryResult<ObservationId> {
        let interval = observation.interval().ok_or_else(|| {
            RepositoryError::ValidationError("observation interval is empty".to_string())
        })?;

        let mut data = self.data.write();

        // No two observations on one station may ever overlap, even if a
        // caller bypasses the service-layer commit lock.
        let conflict = data.observations.values().any(|o| {
            o.station_id == observation.station_id
                && o.interval().is_some_and(|existing| existing.overlaps(&interval))
        });
        if conflict {
            return Err(RepositoryError::ValidationError(format!(
                "observation {} on station {} overlaps an existing observation",
                interval, observation.station_id
            )));
        }

        data.next_observation_id += 1;
        let id = ObservationId::new(data.next_observation_id);
        let mut stored = observation.clone();
        stored.id = Some(id);
        data.observations.insert(id, stored);
        debug!(
            "stored observation {} on station {} at {}",
            id, observation.station_id, interval
        );
        Ok(id)
    }

    async fn delete_observation(&self, id: ObservationId) -> RepositoryResult<()> {
        self.data
            .write()
            .observations
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("observation {}", id)))
    }
}
