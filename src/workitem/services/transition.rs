//! Stage transition and script attachment orchestration.

use crate::audit::{
    domain::{Actor, CorrelationId, EventType, WorkflowEvent},
    ports::{AuditLogError, WorkflowEventLog},
};
use crate::workitem::{
    domain::{
        AttachOptions, ContentRef, Stage, TransitionPayload, WorkItem, WorkItemId,
        WorkflowDomainError,
    },
    ports::{WorkItemRepository, WorkItemRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Request payload for applying a stage transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyTransitionRequest {
    item_id: WorkItemId,
    target: Stage,
    payload: TransitionPayload,
    actor: Actor,
}

impl ApplyTransitionRequest {
    /// Creates a transition request with an empty payload.
    #[must_use]
    pub const fn new(item_id: WorkItemId, target: Stage, actor: Actor) -> Self {
        Self {
            item_id,
            target,
            payload: TransitionPayload::empty(),
            actor,
        }
    }

    /// Attaches the transition payload carrying artifact or rejection data.
    #[must_use]
    pub fn with_payload(mut self, payload: TransitionPayload) -> Self {
        self.payload = payload;
        self
    }
}

/// Request payload for attaching a script to a work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachScriptRequest {
    item_id: WorkItemId,
    content: ContentRef,
    options: AttachOptions,
    actor: Actor,
}

impl AttachScriptRequest {
    /// Creates an attach request with default options.
    #[must_use]
    pub const fn new(item_id: WorkItemId, content: ContentRef, actor: Actor) -> Self {
        Self {
            item_id,
            content,
            options: AttachOptions::new(),
            actor,
        }
    }

    /// Sets the attach options.
    #[must_use]
    pub const fn with_options(mut self, options: AttachOptions) -> Self {
        self.options = options;
        self
    }
}

/// Service-level errors for transition operations.
#[derive(Debug, Error)]
pub enum TransitionError {
    /// Domain validation refused the mutation.
    #[error(transparent)]
    Domain(#[from] WorkflowDomainError),
    /// Repository operation failed or lost a version race.
    #[error(transparent)]
    Repository(#[from] WorkItemRepositoryError),
    /// The audit log rejected an event append.
    #[error(transparent)]
    Audit(#[from] AuditLogError),
}

/// Result type for transition service operations.
pub type TransitionResult<T> = Result<T, TransitionError>;

/// Work item mutation service.
///
/// Mutations follow a load, validate, compare-and-set, record sequence: the
/// version captured at load time guards the write, and the audit event is
/// appended only after the write commits.
#[derive(Clone)]
pub struct TransitionService<W, A, C>
where
    W: WorkItemRepository,
    A: WorkflowEventLog,
    C: Clock + Send + Sync,
{
    items: Arc<W>,
    audit: Arc<A>,
    clock: Arc<C>,
}

impl<W, A, C> TransitionService<W, A, C>
where
    W: WorkItemRepository,
    A: WorkflowEventLog,
    C: Clock + Send + Sync,
{
    /// Creates a new transition service.
    #[must_use]
    pub const fn new(items: Arc<W>, audit: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            items,
            audit,
            clock,
        }
    }

    /// Creates and stores a new work item in the initial stage.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Repository`] when the store fails.
    pub async fn create(&self) -> TransitionResult<WorkItem> {
        let item = WorkItem::new(&*self.clock);
        self.items.store(&item).await?;
        Ok(item)
    }

    /// Applies a stage transition, minting a fresh correlation identifier.
    ///
    /// # Errors
    ///
    /// As [`TransitionService::apply_correlated`].
    pub async fn apply(&self, request: ApplyTransitionRequest) -> TransitionResult<WorkItem> {
        self.apply_correlated(request, CorrelationId::new()).await
    }

    /// Applies a stage transition, tagging its audit event with a
    /// caller-supplied correlation identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Domain`] when the workflow graph or a
    /// precondition refuses the move, or [`TransitionError::Repository`] on
    /// a missing item or lost version race.
    pub async fn apply_correlated(
        &self,
        request: ApplyTransitionRequest,
        correlation: CorrelationId,
    ) -> TransitionResult<WorkItem> {
        let mut item = self.load(request.item_id).await?;
        let expected = item.version();
        let from = item.stage();

        item.transition_to(request.target, &request.payload, &*self.clock)?;
        if let Err(err) = self.items.update(&item, expected).await {
            if err.is_contention() {
                debug!(item_id = %item.id(), "transition lost version race");
            }
            return Err(err.into());
        }

        let mut event = WorkflowEvent::record(
            item.id(),
            EventType::StageChanged,
            request.actor,
            correlation,
            &*self.clock,
        )
        .with_stages(from, request.target);
        if let Some(rejection) = &request.payload.rejection
            && let Some(notes) = &rejection.notes
        {
            event = event.with_notes(notes.clone());
        }
        self.audit.append(&event).await?;
        Ok(item)
    }

    /// Attaches and locks a script reference on a work item.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Domain`] for unapproved or already-locked
    /// scripts, or [`TransitionError::Repository`] on a missing item or lost
    /// version race.
    pub async fn attach_script(&self, request: AttachScriptRequest) -> TransitionResult<WorkItem> {
        let mut item = self.load(request.item_id).await?;
        let expected = item.version();
        let notes = request.content.to_string();

        item.attach_script(request.content, request.options)?;
        self.items.update(&item, expected).await?;

        let event = WorkflowEvent::record(
            item.id(),
            EventType::ScriptAttached,
            request.actor,
            CorrelationId::new(),
            &*self.clock,
        )
        .with_notes(notes);
        self.audit.append(&event).await?;
        Ok(item)
    }

    /// Archives a work item. Returns the item unchanged when it was already
    /// archived; no event is emitted in that case.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Repository`] on a missing item or lost
    /// version race.
    pub async fn archive(
        &self,
        item_id: WorkItemId,
        actor: Actor,
        correlation: CorrelationId,
    ) -> TransitionResult<WorkItem> {
        let mut item = self.load(item_id).await?;
        let expected = item.version();

        if item.archive(&*self.clock) {
            self.items.update(&item, expected).await?;
            let event = WorkflowEvent::record(
                item.id(),
                EventType::Archived,
                actor,
                correlation,
                &*self.clock,
            );
            self.audit.append(&event).await?;
        }
        Ok(item)
    }

    async fn load(&self, item_id: WorkItemId) -> TransitionResult<WorkItem> {
        self.items
            .find_by_id(item_id)
            .await?
            .ok_or(TransitionError::Repository(
                WorkItemRepositoryError::NotFound(item_id),
            ))
    }
}
