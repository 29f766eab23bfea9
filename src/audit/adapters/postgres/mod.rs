//! `PostgreSQL` adapters for the workflow event log.

pub mod log;
pub mod models;
pub mod schema;

pub use log::{AuditPgPool, PostgresEventLog};
