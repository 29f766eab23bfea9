//! Port for automatic reassignment of expired leases.

use crate::lease::domain::{ActorId, HolderRole};
use crate::workitem::domain::WorkItemId;
use async_trait::async_trait;

/// Next holder selected by a reassignment policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Actor to grant the fresh lease to.
    pub actor: ActorId,
    /// Role the fresh lease is granted under.
    pub role: HolderRole,
}

impl Assignment {
    /// Creates an assignment.
    #[must_use]
    pub const fn new(actor: ActorId, role: HolderRole) -> Self {
        Self { actor, role }
    }
}

/// Policy consulted by the reaper when reclaiming expired leases.
///
/// The policy is advisory: returning `None` means no pool-eligible holder is
/// available for the lane and the reaper falls back to a plain release.
#[async_trait]
pub trait ReassignmentPolicy: Send + Sync {
    /// Selects the next pool-eligible holder for the item's role lane.
    async fn next_holder(&self, item_id: WorkItemId, lane: HolderRole) -> Option<Assignment>;
}
