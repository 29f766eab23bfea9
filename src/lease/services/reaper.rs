//! Maintenance sweeps over expired leases.

use crate::audit::{
    domain::{Actor, CorrelationId, EventType, WorkflowEvent},
    ports::{AuditLogError, WorkflowEventLog},
};
use crate::config::LeaseConfig;
use crate::lease::{
    domain::Lease,
    ports::{LeaseRepository, LeaseRepositoryError, ReassignmentPolicy},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for reaper sweeps.
#[derive(Debug, Error)]
pub enum ReaperError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] LeaseRepositoryError),
    /// The audit log rejected an event append.
    #[error(transparent)]
    Audit(#[from] AuditLogError),
}

/// Result type for reaper operations.
pub type ReaperResult<T> = Result<T, ReaperError>;

/// Periodic maintenance service that clears expired leases.
///
/// Sweeps are idempotent: each candidate is removed through an atomic
/// take-if-expired, so a lease renewed mid-sweep or taken by a concurrent
/// sweep is skipped rather than double-counted. All events from one sweep
/// share a correlation identifier and are attributed to the system actor.
#[derive(Clone)]
pub struct Reaper<L, A, C>
where
    L: LeaseRepository,
    A: WorkflowEventLog,
    C: Clock + Send + Sync,
{
    leases: Arc<L>,
    audit: Arc<A>,
    config: LeaseConfig,
    clock: Arc<C>,
    policy: Option<Arc<dyn ReassignmentPolicy>>,
}

impl<L, A, C> Reaper<L, A, C>
where
    L: LeaseRepository,
    A: WorkflowEventLog,
    C: Clock + Send + Sync,
{
    /// Creates a reaper that releases expired leases without reassignment.
    #[must_use]
    pub const fn new(leases: Arc<L>, audit: Arc<A>, config: LeaseConfig, clock: Arc<C>) -> Self {
        Self {
            leases,
            audit,
            config,
            clock,
            policy: None,
        }
    }

    /// Sets the reassignment policy consulted by [`Reaper::reclaim_expired`].
    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn ReassignmentPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Removes every expired lease, returning how many were released.
    ///
    /// # Errors
    ///
    /// Returns [`ReaperError`] when listing or removal fails; leases already
    /// processed stay released.
    pub async fn release_stale(&self) -> ReaperResult<usize> {
        let now = self.clock.utc();
        let correlation = CorrelationId::new();
        let mut released = 0_usize;

        for candidate in self.leases.expired(now).await? {
            let Some(taken) = self.leases.take_expired(candidate.work_item_id, now).await? else {
                continue;
            };
            self.append_expired(&taken, correlation).await?;
            released += 1;
        }

        info!(released, "stale lease sweep complete");
        Ok(released)
    }

    /// Removes every expired lease and, where the reassignment policy names
    /// a successor for the holder's role lane, grants the successor a fresh
    /// lease. Returns how many expired leases were processed.
    ///
    /// Without a policy this degrades to [`Reaper::release_stale`].
    ///
    /// # Errors
    ///
    /// Returns [`ReaperError`] when listing, removal, or regrant fails.
    pub async fn reclaim_expired(&self) -> ReaperResult<usize> {
        let Some(policy) = self.policy.clone() else {
            return self.release_stale().await;
        };

        let now = self.clock.utc();
        let correlation = CorrelationId::new();
        let mut reclaimed = 0_usize;

        for candidate in self.leases.expired(now).await? {
            let Some(taken) = self.leases.take_expired(candidate.work_item_id, now).await? else {
                continue;
            };
            reclaimed += 1;

            let Some(assignment) = policy
                .next_holder(taken.work_item_id, taken.holder_role)
                .await
            else {
                self.append_expired(&taken, correlation).await?;
                continue;
            };

            let replacement = Lease::grant(
                taken.work_item_id,
                assignment.actor,
                assignment.role,
                self.config.duration(),
                &*self.clock,
            );
            match self.leases.claim(&replacement, now).await {
                Ok(()) => {
                    let event = WorkflowEvent::record(
                        taken.work_item_id,
                        EventType::LeaseReassigned,
                        Actor::System,
                        correlation,
                        &*self.clock,
                    )
                    .with_notes(format!(
                        "reassigned from {} to {}",
                        taken.holder, replacement.holder
                    ));
                    self.audit.append(&event).await?;
                }
                Err(LeaseRepositoryError::AlreadyClaimed { .. }) => {
                    // A manual claim slipped in between take and regrant;
                    // their lease wins and the expiry still gets recorded.
                    debug!(item_id = %taken.work_item_id, "regrant lost to concurrent claim");
                    self.append_expired(&taken, correlation).await?;
                }
                Err(err) => return Err(err.into()),
            }
        }

        info!(reclaimed, "expired lease reclaim complete");
        Ok(reclaimed)
    }

    async fn append_expired(
        &self,
        taken: &Lease,
        correlation: CorrelationId,
    ) -> ReaperResult<()> {
        let event = WorkflowEvent::record(
            taken.work_item_id,
            EventType::LeaseExpired,
            Actor::System,
            correlation,
            &*self.clock,
        )
        .with_notes(format!("expired lease held by {}", taken.holder));
        self.audit.append(&event).await?;
        Ok(())
    }
}
