//! Round-robin reassignment policy over a fixed pool of actors.
//!
//! Suitable for tests and for deployments where pool membership is static
//! per role lane; production deployments typically adapt this port to the
//! external identity collaborator instead.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::lease::{
    domain::{ActorId, HolderRole},
    ports::{Assignment, ReassignmentPolicy},
};
use crate::workitem::domain::WorkItemId;

/// Round-robin rotation through a fixed pool of actors per role lane.
#[derive(Debug, Default)]
pub struct RoundRobinReassignment {
    lanes: HashMap<HolderRole, Arc<Lane>>,
}

#[derive(Debug)]
struct Lane {
    pool: Vec<ActorId>,
    cursor: AtomicUsize,
}

impl RoundRobinReassignment {
    /// Creates a policy with no pools; every lane falls back to release.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the actor pool for a role lane.
    #[must_use]
    pub fn with_lane(mut self, role: HolderRole, pool: impl IntoIterator<Item = ActorId>) -> Self {
        let lane = Lane {
            pool: pool.into_iter().collect(),
            cursor: AtomicUsize::new(0),
        };
        self.lanes.insert(role, Arc::new(lane));
        self
    }
}

#[async_trait]
impl ReassignmentPolicy for RoundRobinReassignment {
    async fn next_holder(&self, _item_id: WorkItemId, lane: HolderRole) -> Option<Assignment> {
        let pool_lane = self.lanes.get(&lane)?;
        if pool_lane.pool.is_empty() {
            return None;
        }
        // Wrap the cursor manually; the stored value stays below pool length.
        let index = pool_lane
            .cursor
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |cursor| {
                let next = cursor + 1;
                Some(if next >= pool_lane.pool.len() { 0 } else { next })
            })
            .unwrap_or(0);
        pool_lane
            .pool
            .get(index)
            .cloned()
            .map(|actor| Assignment::new(actor, lane))
    }
}
