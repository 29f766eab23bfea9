//! Thread-safe in-memory workflow event log.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::audit::{
    domain::WorkflowEvent,
    ports::{AuditLogError, AuditLogResult, WorkflowEventLog},
};
use crate::workitem::domain::WorkItemId;

/// Thread-safe in-memory event log. Append-only by construction.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventLog {
    events: Arc<RwLock<Vec<WorkflowEvent>>>,
}

impl InMemoryEventLog {
    /// Creates an empty in-memory event log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every recorded event, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AuditLogError::Persistence`] when the log lock is poisoned.
    pub fn all(&self) -> AuditLogResult<Vec<WorkflowEvent>> {
        let events = self.events.read().map_err(lock_poisoned)?;
        Ok(events.clone())
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> AuditLogError {
    AuditLogError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl WorkflowEventLog for InMemoryEventLog {
    async fn append(&self, event: &WorkflowEvent) -> AuditLogResult<()> {
        let mut events = self.events.write().map_err(lock_poisoned)?;
        events.push(event.clone());
        Ok(())
    }

    async fn for_item(&self, item_id: WorkItemId) -> AuditLogResult<Vec<WorkflowEvent>> {
        let events = self.events.read().map_err(lock_poisoned)?;
        Ok(events
            .iter()
            .filter(|event| event.work_item_id == item_id)
            .cloned()
            .collect())
    }
}
