//! Error types for lease domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing lease domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LeaseDomainError {
    /// The actor identifier is empty after trimming.
    #[error("actor identifier must not be empty")]
    EmptyActorId,

    /// The actor identifier collides with the reserved system actor.
    #[error("actor identifier 'system' is reserved for engine actions")]
    ReservedActorId,
}

/// Error returned while parsing holder roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown holder role: {0}")]
pub struct ParseRoleError(pub String);
