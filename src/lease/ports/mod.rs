//! Port contracts for lease persistence and reassignment.
//!
//! Ports define infrastructure-agnostic interfaces used by lease services.

pub mod reassignment;
pub mod repository;

pub use reassignment::{Assignment, ReassignmentPolicy};
pub use repository::{LeaseRepository, LeaseRepositoryError, LeaseRepositoryResult, ReleaseOutcome};
