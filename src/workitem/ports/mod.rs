//! Port contracts for work item persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by workflow services.

pub mod repository;

pub use repository::{
    QueueFilter, WorkItemRepository, WorkItemRepositoryError, WorkItemRepositoryResult,
};
