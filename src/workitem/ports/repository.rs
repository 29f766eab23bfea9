//! Repository port for work item persistence and queue listing.

use crate::workitem::domain::{Stage, WorkItem, WorkItemId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for work item repository operations.
pub type WorkItemRepositoryResult<T> = Result<T, WorkItemRepositoryError>;

/// Filter for queue listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueFilter {
    /// Restrict to items in this stage.
    pub stage: Option<Stage>,
    /// Include archived items. Defaults to excluding them.
    pub include_archived: bool,
    /// Maximum number of items to return.
    pub limit: Option<usize>,
}

impl QueueFilter {
    /// Creates an empty filter matching all non-archived items.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stage: None,
            include_archived: false,
            limit: None,
        }
    }

    /// Restricts the filter to one stage.
    #[must_use]
    pub const fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Includes archived items in the listing.
    #[must_use]
    pub const fn with_archived(mut self) -> Self {
        self.include_archived = true;
        self
    }

    /// Caps the number of returned items.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Work item persistence contract.
///
/// `update` is a compare-and-set on the item's version counter: implementers
/// must reject writes whose expected version no longer matches storage so at
/// most one racing stage change is accepted per version.
#[async_trait]
pub trait WorkItemRepository: Send + Sync {
    /// Stores a new work item.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemRepositoryError::DuplicateItem`] when the item ID
    /// already exists.
    async fn store(&self, item: &WorkItem) -> WorkItemRepositoryResult<()>;

    /// Persists changes to an existing item when the stored version equals
    /// `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemRepositoryError::NotFound`] when the item does not
    /// exist or [`WorkItemRepositoryError::VersionConflict`] when another
    /// writer committed first.
    async fn update(
        &self,
        item: &WorkItem,
        expected_version: u64,
    ) -> WorkItemRepositoryResult<()>;

    /// Finds a work item by identifier.
    ///
    /// Returns `None` when the item does not exist.
    async fn find_by_id(&self, id: WorkItemId) -> WorkItemRepositoryResult<Option<WorkItem>>;

    /// Lists work items matching the filter, ordered by priority score
    /// descending then creation time ascending.
    async fn list(&self, filter: &QueueFilter) -> WorkItemRepositoryResult<Vec<WorkItem>>;
}

/// Errors returned by work item repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkItemRepositoryError {
    /// A work item with the same identifier already exists.
    #[error("duplicate work item identifier: {0}")]
    DuplicateItem(WorkItemId),

    /// The work item was not found.
    #[error("work item not found: {0}")]
    NotFound(WorkItemId),

    /// Another writer committed a change first.
    #[error("stale version for work item {0}")]
    VersionConflict(WorkItemId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkItemRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns `true` for contention errors a caller can recover from by
    /// re-fetching state.
    #[must_use]
    pub const fn is_contention(&self) -> bool {
        matches!(self, Self::VersionConflict(_))
    }
}
