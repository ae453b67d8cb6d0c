//! Service layer for business logic and orchestration.
//!
//! Services sit between the repository and the callers (API or CLI layers,
//! out of scope here). They orchestrate repository reads, propagation calls,
//! and the pure scheduling core, and own the per-station commit locking that
//! the core deliberately does not.

pub mod scheduling;

pub use scheduling::SchedulingService;
