//! Request payloads for engine-level operations.

use crate::audit::domain::Actor;
use crate::lease::domain::{ActorId, HolderRole};
use crate::workitem::domain::{Stage, TransitionPayload, WorkItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request payload for creating a work item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItemRequest {
    /// Initial priority score for queue ordering.
    pub priority_score: i64,
    /// Explicit SLA deadline, if any.
    pub sla_deadline_at: Option<DateTime<Utc>>,
}

impl NewItemRequest {
    /// Creates a request with default priority and no explicit deadline.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            priority_score: 0,
            sla_deadline_at: None,
        }
    }

    /// Sets the initial priority score.
    #[must_use]
    pub const fn with_priority_score(mut self, priority_score: i64) -> Self {
        self.priority_score = priority_score;
        self
    }

    /// Sets an explicit SLA deadline.
    #[must_use]
    pub const fn with_sla_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.sla_deadline_at = Some(deadline);
        self
    }
}

/// Request payload for claiming an item and applying a transition in one
/// logical operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimThenApplyRequest {
    /// Item to claim and transition.
    pub item_id: WorkItemId,
    /// Actor making the claim.
    pub actor: ActorId,
    /// Role the claim is made under.
    pub role: HolderRole,
    /// Stage to transition to once claimed.
    pub target: Stage,
    /// Payload accompanying the transition.
    pub payload: TransitionPayload,
}

impl ClaimThenApplyRequest {
    /// Creates a claim-then-apply request with an empty payload.
    #[must_use]
    pub const fn new(item_id: WorkItemId, actor: ActorId, role: HolderRole, target: Stage) -> Self {
        Self {
            item_id,
            actor,
            role,
            target,
            payload: TransitionPayload::empty(),
        }
    }

    /// Attaches the transition payload.
    #[must_use]
    pub fn with_payload(mut self, payload: TransitionPayload) -> Self {
        self.payload = payload;
        self
    }
}

/// Request payload for applying one transition across many items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkTransitionRequest {
    /// Items to transition.
    pub item_ids: Vec<WorkItemId>,
    /// Stage every item transitions to.
    pub target: Stage,
    /// Payload applied to every item.
    pub payload: TransitionPayload,
    /// Actor attributed to every per-item event.
    pub actor: Actor,
}

impl BulkTransitionRequest {
    /// Creates a bulk transition request with an empty payload.
    #[must_use]
    pub const fn new(item_ids: Vec<WorkItemId>, target: Stage, actor: Actor) -> Self {
        Self {
            item_ids,
            target,
            payload: TransitionPayload::empty(),
            actor,
        }
    }

    /// Attaches the transition payload.
    #[must_use]
    pub fn with_payload(mut self, payload: TransitionPayload) -> Self {
        self.payload = payload;
        self
    }
}

/// Request payload for archiving many items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkArchiveRequest {
    /// Items to archive.
    pub item_ids: Vec<WorkItemId>,
    /// Actor requesting the archive.
    pub actor: ActorId,
    /// Archive items even while another actor holds a live lease.
    pub override_leases: bool,
}

impl BulkArchiveRequest {
    /// Creates a bulk archive request that respects live leases.
    #[must_use]
    pub const fn new(item_ids: Vec<WorkItemId>, actor: ActorId) -> Self {
        Self {
            item_ids,
            actor,
            override_leases: false,
        }
    }

    /// Archives items even when another actor holds a live lease.
    #[must_use]
    pub const fn with_override(mut self) -> Self {
        self.override_leases = true;
        self
    }
}
