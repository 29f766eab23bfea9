//! Repository port for lease persistence.
//!
//! Claim, release, replace, and renew are atomic at the granularity of one
//! work item: implementations serialise concurrent callers per item (a write
//! lock in memory, row locking in `PostgreSQL`) so racing claims yield
//! exactly one winner. Expiry checks inside these operations go through
//! [`Lease::is_live`] with the caller-supplied `now`.

use crate::lease::domain::{ActorId, Lease};
use crate::workitem::domain::WorkItemId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for lease repository operations.
pub type LeaseRepositoryResult<T> = Result<T, LeaseRepositoryError>;

/// Outcome of a release request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// A live lease held by the caller was removed.
    Released,
    /// No live lease existed; releasing is an idempotent no-op.
    NoLiveLease,
}

/// Lease persistence contract.
#[async_trait]
pub trait LeaseRepository: Send + Sync {
    /// Installs `lease` for its work item iff no live lease exists there.
    ///
    /// An expired lease row is replaced as if absent.
    ///
    /// # Errors
    ///
    /// Returns [`LeaseRepositoryError::AlreadyClaimed`] when a live lease
    /// exists, carrying the current holder for the caller's error surface.
    async fn claim(&self, lease: &Lease, now: DateTime<Utc>) -> LeaseRepositoryResult<()>;

    /// Finds the lease row for a work item, live or expired.
    ///
    /// Callers must apply [`Lease::is_live`] before treating the result as a
    /// claim.
    async fn find_by_item(&self, item_id: WorkItemId) -> LeaseRepositoryResult<Option<Lease>>;

    /// Removes the live lease held by `actor`, if any.
    ///
    /// Absent or expired leases make this an idempotent
    /// [`ReleaseOutcome::NoLiveLease`] success.
    ///
    /// # Errors
    ///
    /// Returns [`LeaseRepositoryError::NotHolder`] when a live lease exists
    /// but is held by someone else.
    async fn release(
        &self,
        item_id: WorkItemId,
        actor: &ActorId,
        now: DateTime<Utc>,
    ) -> LeaseRepositoryResult<ReleaseOutcome>;

    /// Atomically replaces the live lease held by `from` with `replacement`.
    ///
    /// # Errors
    ///
    /// Returns [`LeaseRepositoryError::NotHolder`] when no live lease is
    /// held by `from`.
    async fn replace(
        &self,
        item_id: WorkItemId,
        from: &ActorId,
        replacement: &Lease,
        now: DateTime<Utc>,
    ) -> LeaseRepositoryResult<()>;

    /// Extends the live lease held by `actor` to `new_expires_at`.
    ///
    /// # Errors
    ///
    /// Returns [`LeaseRepositoryError::NotHolder`] when no live lease is
    /// held by `actor`.
    async fn renew(
        &self,
        item_id: WorkItemId,
        actor: &ActorId,
        new_expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> LeaseRepositoryResult<Lease>;

    /// Lists leases whose expiry has passed at `now`.
    async fn expired(&self, now: DateTime<Utc>) -> LeaseRepositoryResult<Vec<Lease>>;

    /// Atomically removes and returns the lease for `item_id` iff it is
    /// expired at `now`.
    ///
    /// Returns `None` when the lease is absent or still live, which is what
    /// makes reaper sweeps idempotent and safe to run concurrently.
    async fn take_expired(
        &self,
        item_id: WorkItemId,
        now: DateTime<Utc>,
    ) -> LeaseRepositoryResult<Option<Lease>>;
}

/// Errors returned by lease repository implementations.
#[derive(Debug, Clone, Error)]
pub enum LeaseRepositoryError {
    /// A live lease already exists for the item.
    #[error("work item {} is claimed by {} until {}", .existing.work_item_id, .existing.holder, .existing.expires_at)]
    AlreadyClaimed {
        /// The live lease that blocked the claim.
        existing: Lease,
    },

    /// The caller does not hold the live lease.
    #[error("actor {actor} does not hold the lease on work item {item_id}")]
    NotHolder {
        /// Item whose lease was targeted.
        item_id: WorkItemId,
        /// Actor that made the request.
        actor: ActorId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl LeaseRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns `true` for contention errors a caller can recover from by
    /// retrying against a different item or re-fetching state.
    #[must_use]
    pub const fn is_contention(&self) -> bool {
        matches!(self, Self::AlreadyClaimed { .. } | Self::NotHolder { .. })
    }
}
