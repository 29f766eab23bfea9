//! Primary-action resolution: the single recommended next step for an item.
//!
//! The resolver is a pure, total function over work item state. Rules are
//! priority ordered and the first match wins, encoding the "one clear next
//! step" policy. Every reachable stage matches exactly one rule; the
//! fallback rule makes the function total rather than papering over an
//! unmatched stage at runtime.

use super::WorkItem;
use crate::lease::domain::HolderRole;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The recommended next action for a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Attach and lock a script.
    AttachContent,
    /// Record the item.
    Record,
    /// Approve the reviewed render.
    Approve,
    /// Mark the recording as edited.
    MarkEdited,
    /// Approve the edit for posting.
    ApproveForPosting,
    /// Apply the requested edits.
    ApplyEdits,
    /// Post the item to its platform.
    Post,
    /// Nothing left to do; the item is delivered.
    None,
    /// Regenerate a rejected item.
    Regenerate,
    /// No workflow action applies; the item can only be inspected.
    ViewOnly,
}

impl ActionKind {
    /// Returns the canonical action key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AttachContent => "attach-content",
            Self::Record => "record",
            Self::Approve => "approve",
            Self::MarkEdited => "mark-edited",
            Self::ApproveForPosting => "approve-for-posting",
            Self::ApplyEdits => "apply-edits",
            Self::Post => "post",
            Self::None => "none",
            Self::Regenerate => "regenerate",
            Self::ViewOnly => "view-only",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolved next step for a work item, with the role authorised to take it
/// and whether it is currently blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryAction {
    /// The recommended action.
    pub action: ActionKind,
    /// Role authorised to perform the action, when one is required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_role: Option<HolderRole>,
    /// Whether the action is currently blocked.
    pub blocked: bool,
    /// Human-readable reason when blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

impl PrimaryAction {
    const fn unblocked(action: ActionKind, required_role: Option<HolderRole>) -> Self {
        Self {
            action,
            required_role,
            blocked: false,
            block_reason: None,
        }
    }

    fn blocked_by(
        action: ActionKind,
        required_role: Option<HolderRole>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            action,
            required_role,
            blocked: true,
            block_reason: Some(reason.into()),
        }
    }
}

/// Resolves the single recommended next action for a work item.
#[must_use]
pub fn resolve_primary_action(item: &WorkItem) -> PrimaryAction {
    use super::Stage;

    // Rule 1: nothing can move until a script is locked.
    if !item.has_locked_script() {
        return PrimaryAction::unblocked(ActionKind::AttachContent, Some(HolderRole::Recorder));
    }
    match item.stage() {
        // Rule 1 guarantees a locked script from here on.
        Stage::NotRecorded => {
            PrimaryAction::unblocked(ActionKind::Record, Some(HolderRole::Recorder))
        }
        Stage::ReadyForReview => {
            PrimaryAction::unblocked(ActionKind::Approve, Some(HolderRole::Admin))
        }
        Stage::Recorded => {
            PrimaryAction::unblocked(ActionKind::MarkEdited, Some(HolderRole::Editor))
        }
        Stage::Edited => {
            if item.external_ref().is_some() {
                PrimaryAction::unblocked(ActionKind::ApproveForPosting, Some(HolderRole::Editor))
            } else {
                PrimaryAction::blocked_by(
                    ActionKind::ApproveForPosting,
                    Some(HolderRole::Editor),
                    "no artifact reference attached",
                )
            }
        }
        Stage::ApprovedNeedsEdits => {
            PrimaryAction::unblocked(ActionKind::ApplyEdits, Some(HolderRole::Editor))
        }
        Stage::ReadyToPost => {
            PrimaryAction::unblocked(ActionKind::Post, Some(HolderRole::Uploader))
        }
        Stage::Posted => PrimaryAction::unblocked(ActionKind::None, None),
        Stage::Rejected => {
            PrimaryAction::unblocked(ActionKind::Regenerate, Some(HolderRole::Admin))
        }
        Stage::NeedsScript | Stage::GeneratingScript | Stage::AiRendering => {
            PrimaryAction::unblocked(ActionKind::ViewOnly, None)
        }
    }
}
