//! Adapter implementations of the lease ports.

pub mod memory;
pub mod postgres;
