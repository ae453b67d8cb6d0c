//! Scheduler configuration file and environment variable support.
//!
//! Configuration is read from a TOML file, with individual settings
//! overridable through environment variables. The 30-second guard gap used by
//! overlap resolution is deliberately not configurable; other deployments of
//! the network rely on the exact trimmed boundaries.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::api::OverlapPolicy;

/// Scheduler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Minimum observation duration in seconds. Windows at or below this
    /// length are not schedulable.
    #[serde(default = "default_min_observation_duration_s")]
    pub min_observation_duration_s: i64,
    /// Seconds the pass search cursor advances past each found pass.
    #[serde(default = "default_pass_step_s")]
    pub pass_step_s: i64,
    /// Policy applied when a caller does not specify one.
    #[serde(default = "default_overlap_policy")]
    pub default_overlap_policy: String,
    /// Upper bound on the search horizon, in days.
    #[serde(default = "default_max_horizon_days")]
    pub max_horizon_days: i64,
}

fn default_min_observation_duration_s() -> i64 {
    240
}

fn default_pass_step_s() -> i64 {
    60
}

fn default_overlap_policy() -> String {
    "truncate".to_string()
}

fn default_max_horizon_days() -> i64 {
    2
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_observation_duration_s: default_min_observation_duration_s(),
            pass_step_s: default_pass_step_s(),
            default_overlap_policy: default_overlap_policy(),
            max_horizon_days: default_max_horizon_days(),
        }
    }
}

impl SchedulerConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(SchedulerConfig)` if successful
    /// * `Err(String)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: SchedulerConfig =
            toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Build configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// # Environment Variables
    /// - `PASSPLAN_MIN_DURATION_S` (optional, default: 240)
    /// - `PASSPLAN_PASS_STEP_S` (optional, default: 60)
    /// - `PASSPLAN_OVERLAP_POLICY` (optional, default: truncate)
    /// - `PASSPLAN_MAX_HORIZON_DAYS` (optional, default: 2)
    ///
    /// # Errors
    /// Returns an error if a set variable does not parse.
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();

        if let Ok(v) = env::var("PASSPLAN_MIN_DURATION_S") {
            config.min_observation_duration_s = v
                .parse()
                .map_err(|_| "PASSPLAN_MIN_DURATION_S must be an integer".to_string())?;
        }
        if let Ok(v) = env::var("PASSPLAN_PASS_STEP_S") {
            config.pass_step_s = v
                .parse()
                .map_err(|_| "PASSPLAN_PASS_STEP_S must be an integer".to_string())?;
        }
        if let Ok(v) = env::var("PASSPLAN_OVERLAP_POLICY") {
            config.default_overlap_policy = v;
        }
        if let Ok(v) = env::var("PASSPLAN_MAX_HORIZON_DAYS") {
            config.max_horizon_days = v
                .parse()
                .map_err(|_| "PASSPLAN_MAX_HORIZON_DAYS must be an integer".to_string())?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.min_observation_duration_s <= 0 {
            return Err("min_observation_duration_s must be positive".to_string());
        }
        if self.pass_step_s <= 0 {
            return Err("pass_step_s must be positive".to_string());
        }
        if self.max_horizon_days <= 0 {
            return Err("max_horizon_days must be positive".to_string());
        }
        OverlapPolicy::from_str(&self.default_overlap_policy)?;
        Ok(())
    }

    /// Minimum observation duration as a [`Duration`].
    pub fn min_observation_duration(&self) -> Duration {
        Duration::seconds(self.min_observation_duration_s)
    }

    /// Pass search cursor step as a [`Duration`].
    pub fn pass_step(&self) -> Duration {
        Duration::seconds(self.pass_step_s)
    }

    /// The configured default overlap policy. Validation at load time
    /// guarantees this parses.
    pub fn overlap_policy(&self) -> OverlapPolicy {
        OverlapPolicy::from_str(&self.default_overlap_policy)
            .unwrap_or(OverlapPolicy::Truncate)
    }

    /// Maximum search horizon as a [`Duration`].
    pub fn max_horizon(&self) -> Duration {
        Duration::days(self.max_horizon_days)
    }
}
