//! Engine facade composing the workflow services.

use super::requests::{
    BulkArchiveRequest, BulkTransitionRequest, ClaimThenApplyRequest, NewItemRequest,
};
use crate::audit::{
    domain::{Actor, CorrelationId, WorkflowEvent},
    ports::{AuditLogError, WorkflowEventLog},
};
use crate::config::EngineConfig;
use crate::lease::{
    domain::{ActorId, HolderRole, Lease},
    ports::{LeaseRepository, ReassignmentPolicy, ReleaseOutcome},
    services::{
        HandoffRequest, LeaseManager, LeaseManagerError, Reaper, ReaperError,
    },
};
use crate::workitem::{
    domain::{WorkItem, WorkItemId},
    ports::{WorkItemRepository, WorkItemRepositoryError},
    services::{
        ApplyTransitionRequest, AttachScriptRequest, QueueEntry, QueueError, QueueQuery,
        QueueService, TransitionError, TransitionService,
    },
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Errors surfaced by the engine facade.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The work item does not exist.
    #[error("work item not found: {0}")]
    UnknownItem(WorkItemId),
    /// The operation targets an archived item.
    #[error("work item {0} is archived")]
    ItemArchived(WorkItemId),
    /// Archival refused: another actor holds a live lease on the item.
    #[error("work item {0} is claimed by another actor")]
    HeldByOther(WorkItemId),
    /// Work item persistence failed.
    #[error(transparent)]
    Items(#[from] WorkItemRepositoryError),
    /// A lease operation failed.
    #[error(transparent)]
    Lease(#[from] LeaseManagerError),
    /// A transition operation failed.
    #[error(transparent)]
    Transition(#[from] TransitionError),
    /// A reaper sweep failed.
    #[error(transparent)]
    Reaper(#[from] ReaperError),
    /// A queue listing failed.
    #[error(transparent)]
    Queue(#[from] QueueError),
    /// An audit log read failed.
    #[error(transparent)]
    Audit(#[from] AuditLogError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Outcome of a successful claim-then-apply operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimThenApplyOutcome {
    /// The lease granted by the claim step.
    pub lease: Lease,
    /// The item after the transition.
    pub item: WorkItem,
}

/// One item that failed within a bulk operation.
#[derive(Debug)]
pub struct BulkFailure {
    /// Item the failure concerns.
    pub item_id: WorkItemId,
    /// Why the per-item step failed.
    pub error: EngineError,
}

/// Outcome of a bulk transition.
///
/// Bulk operations are not transactional: items that succeeded stay
/// transitioned even when later items fail.
#[derive(Debug, Default)]
pub struct BulkTransitionOutcome {
    /// Items transitioned successfully.
    pub applied: Vec<WorkItem>,
    /// Items refused, with the per-item error.
    pub failures: Vec<BulkFailure>,
}

/// Outcome of a bulk archive.
#[derive(Debug, Default)]
pub struct BulkArchiveOutcome {
    /// Items archived (or already archived) successfully.
    pub archived: Vec<WorkItemId>,
    /// Items refused, with the per-item error.
    pub failures: Vec<BulkFailure>,
}

/// The workflow engine.
///
/// One facade over the claim, transition, queue, and maintenance services,
/// sharing a single clock and configuration so every component agrees on
/// time and policy.
#[derive(Clone)]
pub struct WorkflowEngine<W, L, A, C>
where
    W: WorkItemRepository,
    L: LeaseRepository,
    A: WorkflowEventLog,
    C: Clock + Send + Sync,
{
    items: Arc<W>,
    audit: Arc<A>,
    manager: LeaseManager<L, A, C>,
    transitions: TransitionService<W, A, C>,
    queue: QueueService<W, L, C>,
    reaper: Reaper<L, A, C>,
    clock: Arc<C>,
}

impl<W, L, A, C> WorkflowEngine<W, L, A, C>
where
    W: WorkItemRepository,
    L: LeaseRepository,
    A: WorkflowEventLog,
    C: Clock + Send + Sync,
{
    /// Creates an engine over the given adapters.
    #[must_use]
    pub fn new(
        items: Arc<W>,
        leases: Arc<L>,
        audit: Arc<A>,
        config: EngineConfig,
        clock: Arc<C>,
    ) -> Self {
        Self {
            items: Arc::clone(&items),
            audit: Arc::clone(&audit),
            manager: LeaseManager::new(
                Arc::clone(&leases),
                Arc::clone(&audit),
                config.lease,
                Arc::clone(&clock),
            ),
            transitions: TransitionService::new(
                Arc::clone(&items),
                Arc::clone(&audit),
                Arc::clone(&clock),
            ),
            queue: QueueService::new(
                Arc::clone(&items),
                Arc::clone(&leases),
                config.sla,
                Arc::clone(&clock),
            ),
            reaper: Reaper::new(leases, audit, config.lease, Arc::clone(&clock)),
            clock,
        }
    }

    /// Installs the reassignment policy consulted when reclaiming expired
    /// leases.
    #[must_use]
    pub fn with_reassignment_policy(mut self, policy: Arc<dyn ReassignmentPolicy>) -> Self {
        self.reaper = self.reaper.with_policy(policy);
        self
    }

    /// Creates and stores a new work item.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Items`] when the store fails.
    pub async fn create_item(&self, request: NewItemRequest) -> EngineResult<WorkItem> {
        let mut item = WorkItem::new(&*self.clock).with_priority_score(request.priority_score);
        if let Some(deadline) = request.sla_deadline_at {
            item = item.with_sla_deadline(deadline);
        }
        self.items.store(&item).await?;
        Ok(item)
    }

    /// Finds a work item by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownItem`] when the item does not exist.
    pub async fn find_item(&self, item_id: WorkItemId) -> EngineResult<WorkItem> {
        self.items
            .find_by_id(item_id)
            .await?
            .ok_or(EngineError::UnknownItem(item_id))
    }

    /// Claims a work item for an actor.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownItem`] or [`EngineError::ItemArchived`]
    /// when the item cannot be claimed at all, and a wrapped
    /// `AlreadyClaimed` when another actor holds a live lease.
    pub async fn claim(
        &self,
        item_id: WorkItemId,
        actor: ActorId,
        role: HolderRole,
    ) -> EngineResult<Lease> {
        self.guard_claimable(item_id).await?;
        Ok(self.manager.claim(item_id, actor, role).await?)
    }

    /// Releases the claim held by `actor` on an item.
    ///
    /// # Errors
    ///
    /// Returns a wrapped `NotHolder` when the live lease belongs to someone
    /// else.
    pub async fn release(
        &self,
        item_id: WorkItemId,
        actor: ActorId,
    ) -> EngineResult<ReleaseOutcome> {
        Ok(self.manager.release(item_id, actor).await?)
    }

    /// Extends the claim held by `actor` by a full lease window.
    ///
    /// # Errors
    ///
    /// Returns a wrapped `NotHolder` when no live lease is held by `actor`.
    pub async fn renew(&self, item_id: WorkItemId, actor: ActorId) -> EngineResult<Lease> {
        Ok(self.manager.renew(item_id, actor).await?)
    }

    /// Hands the claim on an item from one actor to another.
    ///
    /// # Errors
    ///
    /// Returns a wrapped `NotHolder` when the sender does not hold a live
    /// lease.
    pub async fn handoff(&self, request: HandoffRequest) -> EngineResult<Lease> {
        Ok(self.manager.handoff(request).await?)
    }

    /// Applies a stage transition to a work item.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Transition`] when the workflow refuses the
    /// move or the write loses a version race.
    pub async fn transition(&self, request: ApplyTransitionRequest) -> EngineResult<WorkItem> {
        Ok(self.transitions.apply(request).await?)
    }

    /// Attaches and locks a script reference on a work item.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Transition`] for unapproved or already-locked
    /// scripts.
    pub async fn attach_script(&self, request: AttachScriptRequest) -> EngineResult<WorkItem> {
        Ok(self.transitions.attach_script(request).await?)
    }

    /// Claims an item and applies a transition as one logical operation.
    ///
    /// Both audit events share a correlation identifier. When the transition
    /// is refused the freshly granted claim is released again so the item
    /// does not stay locked behind a failed operation.
    ///
    /// # Errors
    ///
    /// Returns the claim error when the claim step fails, otherwise the
    /// transition error.
    pub async fn claim_then_apply(
        &self,
        request: ClaimThenApplyRequest,
    ) -> EngineResult<ClaimThenApplyOutcome> {
        self.guard_claimable(request.item_id).await?;
        let correlation = CorrelationId::new();
        let lease = self
            .manager
            .claim_correlated(
                request.item_id,
                request.actor.clone(),
                request.role,
                correlation,
            )
            .await?;

        let transition = ApplyTransitionRequest::new(
            request.item_id,
            request.target,
            Actor::Human(request.actor.clone()),
        )
        .with_payload(request.payload);
        match self.transitions.apply_correlated(transition, correlation).await {
            Ok(item) => Ok(ClaimThenApplyOutcome { lease, item }),
            Err(err) => {
                if let Err(release_err) = self.manager.release(request.item_id, request.actor).await
                {
                    warn!(
                        item_id = %request.item_id,
                        error = %release_err,
                        "failed to release claim after refused transition",
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Applies one transition across many items.
    ///
    /// Per-item failures are collected rather than aborting the batch; all
    /// per-item events share one correlation identifier.
    pub async fn bulk_transition(&self, request: BulkTransitionRequest) -> BulkTransitionOutcome {
        let correlation = CorrelationId::new();
        let mut outcome = BulkTransitionOutcome::default();

        for item_id in request.item_ids {
            let transition =
                ApplyTransitionRequest::new(item_id, request.target, request.actor.clone())
                    .with_payload(request.payload.clone());
            match self
                .transitions
                .apply_correlated(transition, correlation)
                .await
            {
                Ok(item) => outcome.applied.push(item),
                Err(err) => outcome.failures.push(BulkFailure {
                    item_id,
                    error: err.into(),
                }),
            }
        }
        outcome
    }

    /// Archives many items.
    ///
    /// Items with a live lease held by another actor are refused unless the
    /// request overrides leases; failures are collected per item. All
    /// per-item events share one correlation identifier.
    pub async fn bulk_archive(&self, request: BulkArchiveRequest) -> BulkArchiveOutcome {
        let correlation = CorrelationId::new();
        let mut outcome = BulkArchiveOutcome::default();

        for item_id in request.item_ids {
            match self
                .archive_one(item_id, &request.actor, request.override_leases, correlation)
                .await
            {
                Ok(()) => outcome.archived.push(item_id),
                Err(err) => outcome.failures.push(BulkFailure { item_id, error: err }),
            }
        }
        outcome
    }

    /// Removes every expired lease, returning how many were released.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Reaper`] when the sweep fails partway.
    pub async fn release_stale(&self) -> EngineResult<usize> {
        Ok(self.reaper.release_stale().await?)
    }

    /// Removes every expired lease, reassigning items to pool holders where
    /// the reassignment policy names one.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Reaper`] when the sweep fails partway.
    pub async fn reclaim_expired(&self) -> EngineResult<usize> {
        Ok(self.reaper.reclaim_expired().await?)
    }

    /// Lists the queue projection.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Queue`] when a listing or lease lookup fails.
    pub async fn queue(&self, query: QueueQuery) -> EngineResult<Vec<QueueEntry>> {
        Ok(self.queue.list(query).await?)
    }

    /// Returns the audit history of a work item, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Audit`] when the log read fails.
    pub async fn history(&self, item_id: WorkItemId) -> EngineResult<Vec<WorkflowEvent>> {
        Ok(self.audit.for_item(item_id).await?)
    }

    async fn archive_one(
        &self,
        item_id: WorkItemId,
        actor: &ActorId,
        override_leases: bool,
        correlation: CorrelationId,
    ) -> EngineResult<()> {
        if !override_leases
            && let Some(lease) = self.manager.live_lease(item_id).await?
            && !lease.is_held_by(actor)
        {
            return Err(EngineError::HeldByOther(item_id));
        }
        self.transitions
            .archive(item_id, Actor::Human(actor.clone()), correlation)
            .await?;
        Ok(())
    }

    async fn guard_claimable(&self, item_id: WorkItemId) -> EngineResult<()> {
        let item = self.find_item(item_id).await?;
        if item.is_archived() {
            return Err(EngineError::ItemArchived(item_id));
        }
        Ok(())
    }
}
