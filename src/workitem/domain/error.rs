//! Error types for work item domain validation and parsing.

use super::{ScriptId, Stage, WorkItemId};
use thiserror::Error;

/// Errors returned while validating work item mutations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowDomainError {
    /// The workflow graph does not permit the requested transition.
    #[error("invalid stage transition for {item_id}: {from} -> {to}")]
    InvalidTransition {
        /// Item whose transition was rejected.
        item_id: WorkItemId,
        /// Current stage.
        from: Stage,
        /// Requested stage.
        to: Stage,
    },

    /// Entering the recording lane requires a locked script reference.
    #[error("work item {item_id} has no locked script")]
    MissingLockedScript {
        /// Item missing a locked script.
        item_id: WorkItemId,
    },

    /// `ReadyToPost` may only be entered from a review or approval stage.
    #[error("work item {item_id} cannot enter ready_to_post from {from}")]
    InvalidApprovalPath {
        /// Item whose transition was rejected.
        item_id: WorkItemId,
        /// Stage the item attempted to arrive from.
        from: Stage,
    },

    /// Posting requires an external artifact reference in the payload.
    #[error("work item {item_id} cannot be posted without an artifact reference")]
    MissingArtifact {
        /// Item missing an artifact reference.
        item_id: WorkItemId,
    },

    /// Rejection requires a categorical reason tag or free-text notes.
    #[error("work item {item_id} cannot be rejected without a reason or notes")]
    MissingRejectionReason {
        /// Item missing a rejection reason.
        item_id: WorkItemId,
    },

    /// The script being attached is not approved and no force flag was set.
    #[error("script {script_id} is not approved for work item {item_id}")]
    ScriptNotApproved {
        /// Item the attachment targeted.
        item_id: WorkItemId,
        /// Unapproved script.
        script_id: ScriptId,
    },

    /// A locked script is already attached and no overwrite flag was set.
    #[error("work item {item_id} already has locked script {existing}")]
    ScriptAlreadyLocked {
        /// Item the attachment targeted.
        item_id: WorkItemId,
        /// Currently locked script.
        existing: ScriptId,
    },

    /// Archived items refuse all workflow mutations.
    #[error("work item {item_id} is archived")]
    ItemArchived {
        /// Archived item.
        item_id: WorkItemId,
    },

    /// The artifact URL is empty after trimming.
    #[error("artifact URL must not be empty")]
    EmptyArtifactUrl,

    /// The artifact platform identifier is empty after trimming.
    #[error("artifact platform must not be empty")]
    EmptyArtifactPlatform,
}

/// Error returned while parsing stages from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown stage: {0}")]
pub struct ParseStageError(pub String);
