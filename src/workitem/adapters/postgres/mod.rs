//! `PostgreSQL` adapters for work item persistence.

pub mod models;
pub mod repository;
pub mod schema;

pub use repository::{PostgresWorkItemRepository, WorkItemPgPool};
