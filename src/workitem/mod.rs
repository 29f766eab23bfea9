//! Work item lifecycle management for Cutroom.
//!
//! This module owns the unit of production work: the work item aggregate,
//! the production-stage state machine with its transition preconditions,
//! pure SLA deadline evaluation, and the primary-action resolver that maps
//! item state to the single recommended next step. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
