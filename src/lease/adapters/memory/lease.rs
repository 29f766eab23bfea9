//! Thread-safe in-memory lease repository.
//!
//! The write lock serialises claim, release, replace, renew, and reaper
//! take operations per map access, which satisfies the per-item atomicity
//! the port contract requires.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::lease::{
    domain::{ActorId, Lease},
    ports::{LeaseRepository, LeaseRepositoryError, LeaseRepositoryResult, ReleaseOutcome},
};
use crate::workitem::domain::WorkItemId;

/// Thread-safe in-memory lease repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLeaseRepository {
    state: Arc<RwLock<HashMap<WorkItemId, Lease>>>,
}

impl InMemoryLeaseRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> LeaseRepositoryError {
    LeaseRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl LeaseRepository for InMemoryLeaseRepository {
    async fn claim(&self, lease: &Lease, now: DateTime<Utc>) -> LeaseRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if let Some(existing) = state.get(&lease.work_item_id)
            && existing.is_live(now)
        {
            return Err(LeaseRepositoryError::AlreadyClaimed {
                existing: existing.clone(),
            });
        }
        state.insert(lease.work_item_id, lease.clone());
        Ok(())
    }

    async fn find_by_item(&self, item_id: WorkItemId) -> LeaseRepositoryResult<Option<Lease>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.get(&item_id).cloned())
    }

    async fn release(
        &self,
        item_id: WorkItemId,
        actor: &ActorId,
        now: DateTime<Utc>,
    ) -> LeaseRepositoryResult<ReleaseOutcome> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let Some(existing) = state.get(&item_id) else {
            return Ok(ReleaseOutcome::NoLiveLease);
        };
        if !existing.is_live(now) {
            return Ok(ReleaseOutcome::NoLiveLease);
        }
        if !existing.is_held_by(actor) {
            return Err(LeaseRepositoryError::NotHolder {
                item_id,
                actor: actor.clone(),
            });
        }
        state.remove(&item_id);
        Ok(ReleaseOutcome::Released)
    }

    async fn replace(
        &self,
        item_id: WorkItemId,
        from: &ActorId,
        replacement: &Lease,
        now: DateTime<Utc>,
    ) -> LeaseRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let holds = state
            .get(&item_id)
            .is_some_and(|existing| existing.is_live(now) && existing.is_held_by(from));
        if !holds {
            return Err(LeaseRepositoryError::NotHolder {
                item_id,
                actor: from.clone(),
            });
        }
        state.insert(item_id, replacement.clone());
        Ok(())
    }

    async fn renew(
        &self,
        item_id: WorkItemId,
        actor: &ActorId,
        new_expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> LeaseRepositoryResult<Lease> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let existing = state.get_mut(&item_id).filter(|lease| lease.is_live(now));
        match existing {
            Some(lease) if lease.is_held_by(actor) => {
                lease.expires_at = new_expires_at;
                Ok(lease.clone())
            }
            _ => Err(LeaseRepositoryError::NotHolder {
                item_id,
                actor: actor.clone(),
            }),
        }
    }

    async fn expired(&self, now: DateTime<Utc>) -> LeaseRepositoryResult<Vec<Lease>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .values()
            .filter(|lease| !lease.is_live(now))
            .cloned()
            .collect())
    }

    async fn take_expired(
        &self,
        item_id: WorkItemId,
        now: DateTime<Utc>,
    ) -> LeaseRepositoryResult<Option<Lease>> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let is_expired = state
            .get(&item_id)
            .is_some_and(|lease| !lease.is_live(now));
        if !is_expired {
            return Ok(None);
        }
        Ok(state.remove(&item_id))
    }
}
