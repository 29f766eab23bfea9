//! Actor identity as resolved by the external identity collaborator.

use super::LeaseDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of a human actor.
///
/// Identity resolution happens outside the engine; this type only validates
/// that the identifier is non-empty and does not collide with the reserved
/// system actor used for reaper-issued events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Reserved identifier for engine-issued (reaper) actions.
    pub const SYSTEM: &'static str = "system";

    /// Creates a validated actor identifier.
    ///
    /// # Errors
    ///
    /// Returns [`LeaseDomainError::EmptyActorId`] when the value is empty
    /// after trimming, or [`LeaseDomainError::ReservedActorId`] for the
    /// reserved system identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, LeaseDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LeaseDomainError::EmptyActorId);
        }
        if trimmed == Self::SYSTEM {
            return Err(LeaseDomainError::ReservedActorId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ActorId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
