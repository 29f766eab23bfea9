//! Append-only log port for workflow events.

use crate::audit::domain::WorkflowEvent;
use crate::workitem::domain::WorkItemId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for audit log operations.
pub type AuditLogResult<T> = Result<T, AuditLogError>;

/// Append-only persistence contract for workflow events.
///
/// Implementations only ever insert; events are never updated or deleted,
/// so no locking beyond an atomic insert is required.
#[async_trait]
pub trait WorkflowEventLog: Send + Sync {
    /// Appends an event to the log.
    ///
    /// # Errors
    ///
    /// Returns [`AuditLogError::Persistence`] when the insert fails.
    async fn append(&self, event: &WorkflowEvent) -> AuditLogResult<()>;

    /// Returns the events recorded for a work item, oldest first.
    async fn for_item(&self, item_id: WorkItemId) -> AuditLogResult<Vec<WorkflowEvent>>;
}

/// Errors returned by audit log implementations.
#[derive(Debug, Clone, Error)]
pub enum AuditLogError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuditLogError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
