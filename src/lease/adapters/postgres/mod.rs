//! `PostgreSQL` adapters for lease persistence.

pub mod models;
pub mod repository;
pub mod schema;

pub use repository::{LeasePgPool, PostgresLeaseRepository};
