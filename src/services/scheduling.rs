//! Window search and observation creation.
//!
//! [`SchedulingService`] is the surface callers use: it resolves stations,
//! transmitters, and orbital elements through the repository, delegates the
//! actual work to the pure scheduler core, and persists the result.
//!
//! # Concurrency
//!
//! The read of a station's scheduled observations and the write of a new
//! observation form a check-then-act pair. Both happen while holding that
//! station's commit lock, so two concurrent requests cannot both pass the
//! overlap check and then both commit overlapping observations. Stations are
//! locked independently; requests for different stations never contend.

use chrono::{DateTime, Utc};
use log::{debug, info};
use parking_lot::Mutex;
use qtty::Degrees;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{
    Interval, Observation, ObservationId, ObservationWindow, OverlapPolicy, Station, StationId,
    StationStatus, TransmitterId,
};
use crate::config::SchedulerConfig;
use crate::db::repository::ScheduleRepository;
use crate::propagation::Propagator;
use crate::scheduler::error::{ScheduleError, ScheduleResult};
use crate::scheduler::{factory, search};

/// Orchestrates window search and observation creation for the network.
pub struct SchedulingService {
    repository: Arc<dyn ScheduleRepository>,
    propagator: Arc<dyn Propagator>,
    config: SchedulerConfig,
    station_locks: Mutex<HashMap<StationId, Arc<tokio::sync::Mutex<()>>>>,
}

impl SchedulingService {
    pub fn new(
        repository: Arc<dyn ScheduleRepository>,
        propagator: Arc<dyn Propagator>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            repository,
            propagator,
            config,
            station_locks: Mutex::new(HashMap::new()),
        }
    }

    fn station_lock(&self, station_id: StationId) -> Arc<tokio::sync::Mutex<()>> {
        self.station_locks
            .lock()
            .entry(station_id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    fn require_schedulable(station: &Station) -> ScheduleResult<()> {
        if station.status == StationStatus::Offline {
            return Err(ScheduleError::InvalidRequest(format!(
                "station {} is offline",
                station.id
            )));
        }
        Ok(())
    }

    fn search_interval(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ScheduleResult<Interval> {
        let search = Interval::new(start, end).ok_or_else(|| {
            ScheduleError::InvalidRequest("search interval is empty or inverted".to_string())
        })?;
        if search.duration() > self.config.max_horizon() {
            return Err(ScheduleError::InvalidRequest(format!(
                "search horizon exceeds the {} day maximum",
                self.config.max_horizon_days
            )));
        }
        Ok(search)
    }

    /// Find candidate observation windows for a station and transmitter over
    /// a search horizon.
    ///
    /// # Arguments
    /// * `station_id`, `transmitter_id` - What to schedule where
    /// * `start`, `end` - Search horizon; every returned window lies inside
    ///   a pass that fits entirely within it
    /// * `policy` - Overlap policy; the configured default when `None`
    /// * `min_horizon_override` - Overrides the station's minimum horizon
    ///   when given
    pub async fn find_windows(
        &self,
        station_id: StationId,
        transmitter_id: TransmitterId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        policy: Option<OverlapPolicy>,
        min_horizon_override: Option<Degrees>,
    ) -> ScheduleResult<Vec<ObservationWindow>> {
        let search = self.search_interval(start, end)?;

        let station = self.repository.station(station_id).await?;
        Self::require_schedulable(&station)?;
        let transmitter = self.repository.transmitter(transmitter_id).await?;

        if station.compatible_antenna(&transmitter).is_none() {
            return Err(ScheduleError::InvalidRequest(format!(
                "no antenna on station {} covers transmitter {}",
                station_id, transmitter_id
            )));
        }

        let tle = self
            .repository
            .latest_tle(transmitter.satellite_id)
            .await?
            .ok_or(ScheduleError::NoElements)?;

        let scheduled: Vec<Interval> = self
            .repository
            .scheduled_observations_for(station_id, search.start)
            .await?
            .into_iter()
            .map(|s| s.interval)
            .collect();

        let min_horizon = min_horizon_override.unwrap_or(station.min_horizon);
        let policy = policy.unwrap_or_else(|| self.config.overlap_policy());

        let (passes, windows) = search::find_windows(
            self.propagator.as_ref(),
            &station.location,
            min_horizon,
            &tle,
            &scheduled,
            policy,
            search,
            self.config.min_observation_duration(),
            self.config.pass_step(),
        )?;

        debug!(
            "station {}: {} passes, {} windows for transmitter {} in {}",
            station_id,
            passes.len(),
            windows.len(),
            transmitter_id,
            search
        );
        Ok(windows)
    }

    /// Validate and commit an observation.
    ///
    /// Re-runs overlap resolution against the station's *current* scheduled
    /// observations under the station's commit lock; windows proposed
    /// earlier may have been taken in the meantime.
    ///
    /// # Errors
    /// See [`ScheduleError`]; an [`ScheduleError::Overlap`] is retryable by
    /// requesting fresh windows.
    pub async fn create_observation(
        &self,
        station_id: StationId,
        transmitter_id: TransmitterId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        author: &str,
    ) -> ScheduleResult<Observation> {
        let station = self.repository.station(station_id).await?;
        Self::require_schedulable(&station)?;
        let transmitter = self.repository.transmitter(transmitter_id).await?;
        let satellite = self.repository.satellite(transmitter.satellite_id).await?;

        let lock = self.station_lock(station_id);
        let _guard = lock.lock().await;

        let scheduled: Vec<Interval> = self
            .repository
            .scheduled_observations_for(station_id, start)
            .await?
            .into_iter()
            .map(|s| s.interval)
            .collect();
        let tle = self.repository.latest_tle(transmitter.satellite_id).await?;

        let mut observation = factory::build_observation(
            &station,
            &satellite,
            &transmitter,
            &scheduled,
            tle.as_ref(),
            start,
            end,
            author,
            self.propagator.as_ref(),
        )?;

        let id = self.repository.save_observation(&observation).await?;
        observation.id = Some(id);

        info!(
            "observation {} created on station {} for {} [{} - {}] by {}",
            id, station_id, satellite.name, start, end, author
        );
        Ok(observation)
    }

    /// Cancel an observation, freeing its interval for future scheduling.
    pub async fn cancel_observation(&self, id: ObservationId) -> ScheduleResult<()> {
        self.repository.delete_observation(id).await?;
        info!("observation {} cancelled", id);
        Ok(())
    }
}
