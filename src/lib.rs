//! Cutroom: workflow engine for short-form video production.
//!
//! This crate implements the claiming and workflow machinery that moves a
//! unit of production work (a "work item") through its stages: the exclusive
//! time-boxed lease model, the production state machine, SLA deadline
//! evaluation, the primary-action resolver, and the maintenance, handoff,
//! and bulk operations built on top of them.
//!
//! # Architecture
//!
//! Cutroom follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, memory)
//!
//! # Modules
//!
//! - [`workitem`]: Work item aggregate, workflow state machine, SLA
//!   evaluation, and primary-action resolution
//! - [`lease`]: Exclusive claim leases, handoff, and the maintenance reaper
//! - [`audit`]: Append-only workflow event log
//! - [`engine`]: Cross-context facade exposing the request/response contract
//! - [`config`]: Typed engine configuration

pub mod audit;
pub mod config;
pub mod engine;
pub mod lease;
pub mod workitem;
