//! Application services for work item orchestration.

mod queue;
mod transition;

pub use queue::{QueueEntry, QueueError, QueueQuery, QueueResult, QueueService};
pub use transition::{
    ApplyTransitionRequest, AttachScriptRequest, TransitionError, TransitionResult,
    TransitionService,
};
