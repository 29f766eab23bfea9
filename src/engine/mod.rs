//! The workflow engine facade.
//!
//! Composes the lease manager, transition service, queue projection, and
//! reaper behind one entry point, adding the cross-context guards (item
//! existence, archived checks) and the composite and bulk operations that
//! span more than one service.

mod facade;
mod requests;

pub use facade::{
    BulkArchiveOutcome, BulkFailure, BulkTransitionOutcome, ClaimThenApplyOutcome, EngineError,
    EngineResult, WorkflowEngine,
};
pub use requests::{BulkArchiveRequest, BulkTransitionRequest, ClaimThenApplyRequest, NewItemRequest};
