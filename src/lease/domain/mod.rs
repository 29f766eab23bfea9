//! Domain model for work item leases.

mod actor;
mod error;
mod lease;
mod role;

pub use actor::ActorId;
pub use error::{LeaseDomainError, ParseRoleError};
pub use lease::Lease;
pub use role::HolderRole;
