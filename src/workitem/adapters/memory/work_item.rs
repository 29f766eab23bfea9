//! Thread-safe in-memory work item repository.
//!
//! Used by tests and by embedding callers that do not need durable storage.
//! The write lock provides the per-item atomicity the compare-and-set
//! contract requires.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::workitem::{
    domain::{WorkItem, WorkItemId},
    ports::{QueueFilter, WorkItemRepository, WorkItemRepositoryError, WorkItemRepositoryResult},
};

/// Thread-safe in-memory work item repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkItemRepository {
    state: Arc<RwLock<HashMap<WorkItemId, WorkItem>>>,
}

impl InMemoryWorkItemRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> WorkItemRepositoryError {
    WorkItemRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl WorkItemRepository for InMemoryWorkItemRepository {
    async fn store(&self, item: &WorkItem) -> WorkItemRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.contains_key(&item.id()) {
            return Err(WorkItemRepositoryError::DuplicateItem(item.id()));
        }
        state.insert(item.id(), item.clone());
        Ok(())
    }

    async fn update(
        &self,
        item: &WorkItem,
        expected_version: u64,
    ) -> WorkItemRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let stored = state
            .get_mut(&item.id())
            .ok_or(WorkItemRepositoryError::NotFound(item.id()))?;
        if stored.version() != expected_version {
            return Err(WorkItemRepositoryError::VersionConflict(item.id()));
        }
        *stored = item.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: WorkItemId) -> WorkItemRepositoryResult<Option<WorkItem>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.get(&id).cloned())
    }

    async fn list(&self, filter: &QueueFilter) -> WorkItemRepositoryResult<Vec<WorkItem>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut items: Vec<WorkItem> = state
            .values()
            .filter(|item| filter.stage.is_none_or(|stage| item.stage() == stage))
            .filter(|item| filter.include_archived || !item.is_archived())
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.priority_score()
                .cmp(&a.priority_score())
                .then_with(|| a.created_at().cmp(&b.created_at()))
                .then_with(|| a.id().cmp(&b.id()))
        });
        if let Some(limit) = filter.limit {
            items.truncate(limit);
        }
        Ok(items)
    }
}
