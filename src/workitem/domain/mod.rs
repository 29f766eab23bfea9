//! Domain model for work item lifecycle management.
//!
//! The work item domain models production-stage transitions, script and
//! artifact references, SLA deadline evaluation, and primary-action
//! resolution while keeping all infrastructure concerns outside of the
//! domain boundary.

mod action;
mod content;
mod error;
mod ids;
mod sla;
mod stage;
mod transition;
mod work_item;

pub use action::{ActionKind, PrimaryAction, resolve_primary_action};
pub use content::{ContentRef, ExternalRef};
pub use error::{ParseStageError, WorkflowDomainError};
pub use ids::{ScriptId, WorkItemId};
pub use sla::{SlaStatus, evaluate_sla};
pub use stage::Stage;
pub use transition::{AttachOptions, Rejection, RejectionReason, TransitionPayload};
pub use work_item::{PersistedWorkItemData, WorkItem};
