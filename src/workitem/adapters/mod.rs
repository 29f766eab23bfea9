//! Adapter implementations of the work item ports.

pub mod memory;
pub mod postgres;
