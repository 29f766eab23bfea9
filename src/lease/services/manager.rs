//! Claim, release, renew, and handoff orchestration.

use crate::audit::{
    domain::{Actor, CorrelationId, EventType, WorkflowEvent},
    ports::{AuditLogError, WorkflowEventLog},
};
use crate::config::LeaseConfig;
use crate::lease::{
    domain::{ActorId, HolderRole, Lease, LeaseDomainError},
    ports::{LeaseRepository, LeaseRepositoryError, ReleaseOutcome},
};
use crate::workitem::domain::WorkItemId;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Request payload for handing a claim to another actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffRequest {
    item_id: WorkItemId,
    from: ActorId,
    to: ActorId,
    to_role: HolderRole,
    notes: Option<String>,
}

impl HandoffRequest {
    /// Creates a handoff request between two actors.
    #[must_use]
    pub const fn new(item_id: WorkItemId, from: ActorId, to: ActorId, to_role: HolderRole) -> Self {
        Self {
            item_id,
            from,
            to,
            to_role,
            notes: None,
        }
    }

    /// Attaches free-text handoff notes, recorded in the audit trail.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Service-level errors for lease operations.
#[derive(Debug, Error)]
pub enum LeaseManagerError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] LeaseDomainError),
    /// Repository operation failed or lost a race.
    #[error(transparent)]
    Repository(#[from] LeaseRepositoryError),
    /// The audit log rejected an event append.
    #[error(transparent)]
    Audit(#[from] AuditLogError),
}

/// Result type for lease manager operations.
pub type LeaseManagerResult<T> = Result<T, LeaseManagerError>;

/// Lease lifecycle orchestration service.
///
/// Every successful operation appends exactly one workflow event. A refused
/// handoff additionally appends a `handoff_rejected` event before the error
/// is returned, so contested items leave a trace either way.
#[derive(Clone)]
pub struct LeaseManager<L, A, C>
where
    L: LeaseRepository,
    A: WorkflowEventLog,
    C: Clock + Send + Sync,
{
    leases: Arc<L>,
    audit: Arc<A>,
    config: LeaseConfig,
    clock: Arc<C>,
}

impl<L, A, C> LeaseManager<L, A, C>
where
    L: LeaseRepository,
    A: WorkflowEventLog,
    C: Clock + Send + Sync,
{
    /// Creates a new lease manager.
    #[must_use]
    pub const fn new(leases: Arc<L>, audit: Arc<A>, config: LeaseConfig, clock: Arc<C>) -> Self {
        Self {
            leases,
            audit,
            config,
            clock,
        }
    }

    /// Claims a work item for `actor` under `role`.
    ///
    /// # Errors
    ///
    /// Returns [`LeaseRepositoryError::AlreadyClaimed`] (wrapped) when a live
    /// lease exists; the error carries the current holder.
    pub async fn claim(
        &self,
        item_id: WorkItemId,
        actor: ActorId,
        role: HolderRole,
    ) -> LeaseManagerResult<Lease> {
        self.claim_correlated(item_id, actor, role, CorrelationId::new())
            .await
    }

    /// Claims a work item, tagging the audit event with a caller-supplied
    /// correlation identifier.
    ///
    /// Composite operations use this to group the claim with the events of
    /// the steps that follow it.
    ///
    /// # Errors
    ///
    /// As [`LeaseManager::claim`].
    pub async fn claim_correlated(
        &self,
        item_id: WorkItemId,
        actor: ActorId,
        role: HolderRole,
        correlation: CorrelationId,
    ) -> LeaseManagerResult<Lease> {
        let now = self.clock.utc();
        let lease = Lease::grant(item_id, actor, role, self.config.duration(), &*self.clock);
        if let Err(err) = self.leases.claim(&lease, now).await {
            if err.is_contention() {
                debug!(item_id = %item_id, "claim lost to live lease");
            }
            return Err(err.into());
        }

        let event = WorkflowEvent::record(
            item_id,
            EventType::Claimed,
            Actor::Human(lease.holder.clone()),
            correlation,
            &*self.clock,
        );
        self.audit.append(&event).await?;
        Ok(lease)
    }

    /// Releases the claim held by `actor`.
    ///
    /// Releasing an absent or expired lease succeeds as a no-op and emits no
    /// event.
    ///
    /// # Errors
    ///
    /// Returns [`LeaseRepositoryError::NotHolder`] (wrapped) when the live
    /// lease belongs to someone else.
    pub async fn release(
        &self,
        item_id: WorkItemId,
        actor: ActorId,
    ) -> LeaseManagerResult<ReleaseOutcome> {
        let now = self.clock.utc();
        let outcome = self.leases.release(item_id, &actor, now).await?;
        if outcome == ReleaseOutcome::Released {
            let event = WorkflowEvent::record(
                item_id,
                EventType::Released,
                Actor::Human(actor),
                CorrelationId::new(),
                &*self.clock,
            );
            self.audit.append(&event).await?;
        }
        Ok(outcome)
    }

    /// Extends the claim held by `actor` by a full lease window from now.
    ///
    /// # Errors
    ///
    /// Returns [`LeaseRepositoryError::NotHolder`] (wrapped) when no live
    /// lease is held by `actor`; an expired lease cannot be renewed.
    pub async fn renew(&self, item_id: WorkItemId, actor: ActorId) -> LeaseManagerResult<Lease> {
        let now = self.clock.utc();
        let new_expires_at = now + self.config.duration();
        let lease = self
            .leases
            .renew(item_id, &actor, new_expires_at, now)
            .await?;

        let event = WorkflowEvent::record(
            item_id,
            EventType::LeaseRenewed,
            Actor::Human(actor),
            CorrelationId::new(),
            &*self.clock,
        );
        self.audit.append(&event).await?;
        Ok(lease)
    }

    /// Hands the claim from one actor to another in a single atomic step.
    ///
    /// The recipient receives a fresh lease window. A refused handoff is
    /// recorded as `handoff_rejected` before the error surfaces.
    ///
    /// # Errors
    ///
    /// Returns [`LeaseRepositoryError::NotHolder`] (wrapped) when the sender
    /// does not hold a live lease.
    pub async fn handoff(&self, request: HandoffRequest) -> LeaseManagerResult<Lease> {
        let now = self.clock.utc();
        let replacement = Lease::grant(
            request.item_id,
            request.to,
            request.to_role,
            self.config.duration(),
            &*self.clock,
        );

        match self
            .leases
            .replace(request.item_id, &request.from, &replacement, now)
            .await
        {
            Ok(()) => {
                let notes = request
                    .notes
                    .unwrap_or_else(|| format!("handed off to {}", replacement.holder));
                let event = WorkflowEvent::record(
                    request.item_id,
                    EventType::Handoff,
                    Actor::Human(request.from),
                    CorrelationId::new(),
                    &*self.clock,
                )
                .with_notes(notes);
                self.audit.append(&event).await?;
                Ok(replacement)
            }
            Err(err) => {
                debug!(item_id = %request.item_id, "handoff refused");
                let mut event = WorkflowEvent::record(
                    request.item_id,
                    EventType::HandoffRejected,
                    Actor::Human(request.from),
                    CorrelationId::new(),
                    &*self.clock,
                );
                if let Some(notes) = request.notes {
                    event = event.with_notes(notes);
                }
                self.audit.append(&event).await?;
                Err(err.into())
            }
        }
    }

    /// Returns the live lease on an item, if any.
    ///
    /// Expired rows are filtered out, matching the liveness rule applied by
    /// every other read path.
    ///
    /// # Errors
    ///
    /// Returns [`LeaseManagerError::Repository`] when the lookup fails.
    pub async fn live_lease(&self, item_id: WorkItemId) -> LeaseManagerResult<Option<Lease>> {
        let now = self.clock.utc();
        let lease = self.leases.find_by_item(item_id).await?;
        Ok(lease.filter(|candidate| candidate.is_live(now)))
    }
}
