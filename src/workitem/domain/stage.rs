//! Production stage enum and the workflow transition graph.

use super::ParseStageError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Production stage of a work item.
///
/// Stages on the happy path are ordered; transitions move forward along that
/// order. The single side branch is rejection: any non-terminal stage may
/// move to [`Stage::Rejected`], and the sole restart edge is
/// `Rejected -> NotRecorded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// No script exists yet.
    NeedsScript,
    /// A script is being generated.
    GeneratingScript,
    /// A locked script exists but nothing has been recorded.
    NotRecorded,
    /// An AI render of the recording is in progress.
    AiRendering,
    /// The rendered output awaits review.
    ReadyForReview,
    /// The item has been recorded.
    Recorded,
    /// The recording has been edited.
    Edited,
    /// Approved, but further edits were requested.
    ApprovedNeedsEdits,
    /// Cleared for posting to an external platform.
    ReadyToPost,
    /// Posted to an external platform. True terminal stage.
    Posted,
    /// Rejected with a reason. Terminal unless restarted via `NotRecorded`.
    Rejected,
}

impl Stage {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NeedsScript => "needs_script",
            Self::GeneratingScript => "generating_script",
            Self::NotRecorded => "not_recorded",
            Self::AiRendering => "ai_rendering",
            Self::ReadyForReview => "ready_for_review",
            Self::Recorded => "recorded",
            Self::Edited => "edited",
            Self::ApprovedNeedsEdits => "approved_needs_edits",
            Self::ReadyToPost => "ready_to_post",
            Self::Posted => "posted",
            Self::Rejected => "rejected",
        }
    }

    /// Position of the stage along the happy path, or `None` for the
    /// rejection branch.
    #[must_use]
    pub const fn happy_path_position(self) -> Option<u8> {
        match self {
            Self::NeedsScript => Some(0),
            Self::GeneratingScript => Some(1),
            Self::NotRecorded => Some(2),
            Self::AiRendering => Some(3),
            Self::ReadyForReview => Some(4),
            Self::Recorded => Some(5),
            Self::Edited => Some(6),
            Self::ApprovedNeedsEdits => Some(7),
            Self::ReadyToPost => Some(8),
            Self::Posted => Some(9),
            Self::Rejected => None,
        }
    }

    /// Returns `true` for stages that end the workflow.
    ///
    /// `Posted` is a true terminal; `Rejected` is terminal unless restarted
    /// through the sole `Rejected -> NotRecorded` edge.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Posted | Self::Rejected)
    }

    /// Returns `true` when the workflow graph permits moving from this stage
    /// to `target`.
    ///
    /// Forward moves along the happy path are permitted (including jumps);
    /// back-edges are not. Any non-terminal stage may move to `Rejected`,
    /// and `Rejected` may only restart to `NotRecorded`. Stage-specific
    /// preconditions (locked script, artifact payload, rejection reason)
    /// are enforced by [`super::WorkItem::transition_to`], not here.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        if matches!(target, Self::Rejected) {
            return !self.is_terminal();
        }
        match (self.happy_path_position(), target.happy_path_position()) {
            (Some(from), Some(to)) => to > from,
            // Restart edge: rejection back into the recording lane.
            (None, Some(_)) => matches!(target, Self::NotRecorded),
            (_, None) => false,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for Stage {
    type Error = ParseStageError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "needs_script" => Ok(Self::NeedsScript),
            "generating_script" => Ok(Self::GeneratingScript),
            "not_recorded" => Ok(Self::NotRecorded),
            "ai_rendering" => Ok(Self::AiRendering),
            "ready_for_review" => Ok(Self::ReadyForReview),
            "recorded" => Ok(Self::Recorded),
            "edited" => Ok(Self::Edited),
            "approved_needs_edits" => Ok(Self::ApprovedNeedsEdits),
            "ready_to_post" => Ok(Self::ReadyToPost),
            "posted" => Ok(Self::Posted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseStageError(value.to_owned())),
        }
    }
}
