//! Port contracts for the workflow event log.

pub mod log;

pub use log::{AuditLogError, AuditLogResult, WorkflowEventLog};
