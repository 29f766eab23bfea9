//! Immutable workflow event records.

use crate::lease::domain::ActorId;
use crate::workitem::domain::{Stage, WorkItemId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a workflow event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowEventId(Uuid);

impl WorkflowEventId {
    /// Creates a new random event identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an event identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for WorkflowEventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkflowEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Groups the events emitted by one logical operation.
///
/// Single operations mint a fresh correlation identifier; bulk operations
/// mint one and share it across every per-item event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Creates a new random correlation identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a correlation identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Actor attributed to an event.
///
/// Reaper-issued events carry the system actor so human audit can tell
/// automatic actions from manual ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Actor {
    /// A human actor resolved by the external identity collaborator.
    Human(ActorId),
    /// The engine itself.
    System,
}

impl Actor {
    /// Canonical storage representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Human(actor) => actor.as_str(),
            Self::System => ActorId::SYSTEM,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ActorId> for Actor {
    fn from(actor: ActorId) -> Self {
        Self::Human(actor)
    }
}

/// Error returned while parsing actors from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid actor: {0}")]
pub struct ParseActorError(pub String);

impl TryFrom<&str> for Actor {
    type Error = ParseActorError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value == ActorId::SYSTEM {
            return Ok(Self::System);
        }
        ActorId::new(value)
            .map(Self::Human)
            .map_err(|_| ParseActorError(value.to_owned()))
    }
}

/// Kind of operation an event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A lease was granted.
    Claimed,
    /// A live lease was released by its holder.
    Released,
    /// A live lease had its expiry extended.
    LeaseRenewed,
    /// The reaper removed an expired lease.
    LeaseExpired,
    /// The reaper reassigned an expired lease to a pool holder.
    LeaseReassigned,
    /// A lease was handed off to another actor.
    Handoff,
    /// A handoff attempt was refused.
    HandoffRejected,
    /// A stage transition was accepted.
    StageChanged,
    /// A script was attached and locked.
    ScriptAttached,
    /// The item was archived.
    Archived,
}

impl EventType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Claimed => "claimed",
            Self::Released => "released",
            Self::LeaseRenewed => "lease_renewed",
            Self::LeaseExpired => "lease_expired",
            Self::LeaseReassigned => "lease_reassigned",
            Self::Handoff => "handoff",
            Self::HandoffRejected => "handoff_rejected",
            Self::StageChanged => "stage_changed",
            Self::ScriptAttached => "script_attached",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned while parsing event types from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown event type: {0}")]
pub struct ParseEventTypeError(pub String);

impl TryFrom<&str> for EventType {
    type Error = ParseEventTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "claimed" => Ok(Self::Claimed),
            "released" => Ok(Self::Released),
            "lease_renewed" => Ok(Self::LeaseRenewed),
            "lease_expired" => Ok(Self::LeaseExpired),
            "lease_reassigned" => Ok(Self::LeaseReassigned),
            "handoff" => Ok(Self::Handoff),
            "handoff_rejected" => Ok(Self::HandoffRejected),
            "stage_changed" => Ok(Self::StageChanged),
            "script_attached" => Ok(Self::ScriptAttached),
            "archived" => Ok(Self::Archived),
            _ => Err(ParseEventTypeError(value.to_owned())),
        }
    }
}

/// Immutable record of an accepted transition or lease operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEvent {
    /// Event identifier.
    pub id: WorkflowEventId,
    /// Work item the event concerns.
    pub work_item_id: WorkItemId,
    /// Kind of operation recorded.
    pub event_type: EventType,
    /// Stage before the operation; `None` for lease-only events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_stage: Option<Stage>,
    /// Stage after the operation; `None` for lease-only events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_stage: Option<Stage>,
    /// Actor attributed to the operation.
    pub actor: Actor,
    /// Free-text notes (handoff notes, rejection notes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Groups events from one logical operation.
    pub correlation_id: CorrelationId,
    /// When the event was recorded.
    pub created_at: DateTime<Utc>,
}

impl WorkflowEvent {
    /// Records a new event at the current clock time.
    #[must_use]
    pub fn record(
        work_item_id: WorkItemId,
        event_type: EventType,
        actor: Actor,
        correlation_id: CorrelationId,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: WorkflowEventId::new(),
            work_item_id,
            event_type,
            from_stage: None,
            to_stage: None,
            actor,
            notes: None,
            correlation_id,
            created_at: clock.utc(),
        }
    }

    /// Attaches the stage movement for transition events.
    #[must_use]
    pub const fn with_stages(mut self, from: Stage, to: Stage) -> Self {
        self.from_stage = Some(from);
        self.to_stage = Some(to);
        self
    }

    /// Attaches free-text notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
