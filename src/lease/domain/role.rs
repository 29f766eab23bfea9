//! Production roles that may hold a lease.

use super::ParseRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role under which an actor claims and advances work items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolderRole {
    /// Attaches scripts and records items.
    Recorder,
    /// Edits recordings and approves them for posting.
    Editor,
    /// Posts approved items to external platforms.
    Uploader,
    /// Reviews renders and restarts rejected items.
    Admin,
}

impl HolderRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recorder => "recorder",
            Self::Editor => "editor",
            Self::Uploader => "uploader",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for HolderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for HolderRole {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "recorder" => Ok(Self::Recorder),
            "editor" => Ok(Self::Editor),
            "uploader" => Ok(Self::Uploader),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}
