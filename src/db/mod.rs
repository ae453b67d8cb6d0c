//! Repository layer for stations, satellites, transmitters, and observations.
//!
//! This module provides abstractions for persistence via the Repository
//! pattern, allowing different storage backends to be swapped easily. The
//! scheduling core itself owns no persistent state; everything it reads or
//! writes goes through the [`repository::ScheduleRepository`] trait.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Service Layer (services::scheduling) - Business Logic  │
//! │  - Window search orchestration                          │
//! │  - Commit-time validation under the station lock        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository.rs) - Abstract Interface  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! A production deployment plugs a database-backed implementation into the
//! same trait; the in-memory backend exists for unit testing and local
//! development.

#[cfg(not(any(feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod error;
pub mod factory;
pub mod repository;

#[cfg(feature = "local-repo")]
pub mod local;

pub use error::{RepositoryError, RepositoryResult};
pub use factory::{RepositoryFactory, RepositoryType};
#[cfg(feature = "local-repo")]
pub use local::LocalRepository;
pub use repository::ScheduleRepository;
