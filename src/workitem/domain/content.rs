//! Script and posted-artifact references attached to work items.

use super::{ScriptId, WorkflowDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a script version in the external content store.
///
/// Presence of a `ContentRef` on a work item means the script is locked for
/// production; the approval flag records whether the referenced version was
/// approved at lock time (attachment of unapproved scripts requires an
/// explicit force flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRef {
    /// Identifier of the referenced script.
    pub script_id: ScriptId,
    /// Locked version of the script.
    pub version: u32,
    /// Whether the version was approved when it was locked.
    pub approved: bool,
}

impl ContentRef {
    /// Creates a reference to an approved script version.
    #[must_use]
    pub const fn approved(script_id: ScriptId, version: u32) -> Self {
        Self {
            script_id,
            version,
            approved: true,
        }
    }

    /// Creates a reference to a script version that has not been approved.
    #[must_use]
    pub const fn unapproved(script_id: ScriptId, version: u32) -> Self {
        Self {
            script_id,
            version,
            approved: false,
        }
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@v{}", self.script_id, self.version)
    }
}

/// Reference to a posted artifact on an external platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRef {
    /// URL of the posted artifact.
    pub url: String,
    /// Platform identifier the artifact was posted to.
    pub platform: String,
}

impl ExternalRef {
    /// Creates a validated artifact reference.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyArtifactUrl`] or
    /// [`WorkflowDomainError::EmptyArtifactPlatform`] when either field is
    /// empty after trimming.
    pub fn new(
        url: impl Into<String>,
        platform: impl Into<String>,
    ) -> Result<Self, WorkflowDomainError> {
        let url_value = url.into();
        if url_value.trim().is_empty() {
            return Err(WorkflowDomainError::EmptyArtifactUrl);
        }
        let platform_value = platform.into();
        if platform_value.trim().is_empty() {
            return Err(WorkflowDomainError::EmptyArtifactPlatform);
        }
        Ok(Self {
            url: url_value,
            platform: platform_value,
        })
    }
}

impl fmt::Display for ExternalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.url, self.platform)
    }
}
