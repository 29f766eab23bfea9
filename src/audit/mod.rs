//! Append-only workflow event log for Cutroom.
//!
//! Every accepted stage transition and every lease operation — including
//! failed handoff attempts and reaper sweeps — is recorded as an immutable
//! [`domain::WorkflowEvent`]. Events from one logical operation share a
//! correlation identifier so bulk work can be grouped during audit. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
