//! Transition payloads and script-attachment options.

use super::ExternalRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical reason tag for a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Recording or edit quality is below the bar.
    Quality,
    /// The script itself needs rework.
    ScriptIssue,
    /// Content does not fit the brand.
    OffBrand,
    /// Anything else; free-text notes carry the detail.
    Other,
}

impl RejectionReason {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::ScriptIssue => "script_issue",
            Self::OffBrand => "off_brand",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reason and notes accompanying a transition into `Rejected`.
///
/// At least one of the tag or the notes must be present; the aggregate
/// enforces this when the transition is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// Categorical reason tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectionReason>,
    /// Free-text notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Rejection {
    /// Creates a rejection carrying a categorical reason tag.
    #[must_use]
    pub const fn tagged(reason: RejectionReason) -> Self {
        Self {
            reason: Some(reason),
            notes: None,
        }
    }

    /// Creates a rejection carrying free-text notes only.
    #[must_use]
    pub fn noted(notes: impl Into<String>) -> Self {
        Self {
            reason: None,
            notes: Some(notes.into()),
        }
    }

    /// Adds free-text notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Returns `true` when the rejection carries a tag or non-empty notes.
    #[must_use]
    pub fn is_substantiated(&self) -> bool {
        self.reason.is_some()
            || self
                .notes
                .as_ref()
                .is_some_and(|notes| !notes.trim().is_empty())
    }
}

/// Payload accompanying a stage transition request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionPayload {
    /// Posted artifact reference, required when entering `Posted`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_ref: Option<ExternalRef>,
    /// Rejection reason, required when entering `Rejected`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<Rejection>,
}

impl TransitionPayload {
    /// Creates an empty payload.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            external_ref: None,
            rejection: None,
        }
    }

    /// Attaches a posted artifact reference.
    #[must_use]
    pub fn with_external_ref(mut self, external_ref: ExternalRef) -> Self {
        self.external_ref = Some(external_ref);
        self
    }

    /// Attaches a rejection reason.
    #[must_use]
    pub fn with_rejection(mut self, rejection: Rejection) -> Self {
        self.rejection = Some(rejection);
        self
    }
}

/// Flags controlling script attachment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachOptions {
    /// Permit attaching a script version that has not been approved.
    pub force_unapproved: bool,
    /// Permit replacing an already-locked script.
    pub overwrite: bool,
}

impl AttachOptions {
    /// Creates the default options: approved versions only, no overwrite.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            force_unapproved: false,
            overwrite: false,
        }
    }

    /// Permits attaching an unapproved script version.
    #[must_use]
    pub const fn force_unapproved(mut self) -> Self {
        self.force_unapproved = true;
        self
    }

    /// Permits replacing an already-locked script.
    #[must_use]
    pub const fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }
}
