//! Queue projection joining items with leases, SLA status, and actions.

use crate::config::SlaConfig;
use crate::lease::{
    domain::Lease,
    ports::{LeaseRepository, LeaseRepositoryError},
};
use crate::workitem::{
    domain::{PrimaryAction, SlaStatus, Stage, WorkItem, resolve_primary_action},
    ports::{QueueFilter, WorkItemRepository, WorkItemRepositoryError},
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Query parameters for a queue listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueQuery {
    /// Restrict to items in this stage.
    pub stage: Option<Stage>,
    /// Restrict to claimed (`true`) or unclaimed (`false`) items.
    pub claimed: Option<bool>,
    /// Maximum number of entries to return.
    pub limit: Option<usize>,
}

impl QueueQuery {
    /// Creates an empty query matching every non-archived item.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stage: None,
            claimed: None,
            limit: None,
        }
    }

    /// Restricts the query to one stage.
    #[must_use]
    pub const fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Restricts the query to claimed or unclaimed items.
    #[must_use]
    pub const fn with_claimed(mut self, claimed: bool) -> Self {
        self.claimed = Some(claimed);
        self
    }

    /// Caps the number of returned entries.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One row of the queue projection.
///
/// `lease` is present only while live; an expired lease row reads as
/// unclaimed here just as it does for claim attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueEntry {
    /// The work item.
    pub item: WorkItem,
    /// The live lease on the item, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease: Option<Lease>,
    /// SLA status derived at listing time.
    pub sla_status: SlaStatus,
    /// Suggested next action for the item's current state.
    pub primary_action: PrimaryAction,
}

/// Service-level errors for queue listings.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Work item listing failed.
    #[error(transparent)]
    Items(#[from] WorkItemRepositoryError),
    /// Lease lookup failed.
    #[error(transparent)]
    Leases(#[from] LeaseRepositoryError),
}

/// Result type for queue service operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Read-side projection over the work item queue.
///
/// Every derived field is computed at listing time from one clock reading,
/// so a single response is internally consistent even while writers race.
#[derive(Clone)]
pub struct QueueService<W, L, C>
where
    W: WorkItemRepository,
    L: LeaseRepository,
    C: Clock + Send + Sync,
{
    items: Arc<W>,
    leases: Arc<L>,
    sla: SlaConfig,
    clock: Arc<C>,
}

impl<W, L, C> QueueService<W, L, C>
where
    W: WorkItemRepository,
    L: LeaseRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new queue service.
    #[must_use]
    pub const fn new(items: Arc<W>, leases: Arc<L>, sla: SlaConfig, clock: Arc<C>) -> Self {
        Self {
            items,
            leases,
            sla,
            clock,
        }
    }

    /// Lists queue entries matching the query, ordered by priority score
    /// descending then creation time ascending.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError`] when the item listing or a lease lookup fails.
    pub async fn list(&self, query: QueueQuery) -> QueueResult<Vec<QueueEntry>> {
        let now = self.clock.utc();

        let mut filter = QueueFilter::new();
        if let Some(stage) = query.stage {
            filter = filter.with_stage(stage);
        }
        // The repository limit only applies when no claim filter trims the
        // list afterwards.
        if query.claimed.is_none()
            && let Some(limit) = query.limit
        {
            filter = filter.with_limit(limit);
        }

        let items = self.items.list(&filter).await?;
        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            let lease = self
                .leases
                .find_by_item(item.id())
                .await?
                .filter(|candidate| candidate.is_live(now));

            if let Some(wanted) = query.claimed
                && lease.is_some() != wanted
            {
                continue;
            }

            let sla_status = item.sla_status(now, &self.sla);
            let primary_action = resolve_primary_action(&item);
            entries.push(QueueEntry {
                item,
                lease,
                sla_status,
                primary_action,
            });

            if let Some(limit) = query.limit
                && entries.len() >= limit
            {
                break;
            }
        }
        Ok(entries)
    }
}
