//! Domain model for the workflow event log.

mod event;

pub use event::{
    Actor, CorrelationId, EventType, ParseActorError, ParseEventTypeError, WorkflowEvent,
    WorkflowEventId,
};
