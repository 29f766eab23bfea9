//! Exclusive claim leases for Cutroom work items.
//!
//! A lease is a time-boxed, exclusive claim granting one actor and role the
//! right to advance a work item. This module owns lease liveness, the claim,
//! release, renew, and handoff operations, and the maintenance reaper that
//! sweeps abandoned leases back to the pool. The module follows hexagonal
//! architecture:
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
