//! Work item aggregate root.

use super::{
    AttachOptions, ContentRef, ExternalRef, SlaStatus, Stage, TransitionPayload,
    WorkflowDomainError, WorkItemId, evaluate_sla,
};
use crate::config::SlaConfig;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// The unit of production work tracked through the workflow.
///
/// All state mutations go through validated methods that bump the version
/// counter; repositories compare-and-set on that counter so racing writers
/// lose cleanly instead of clobbering each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    id: WorkItemId,
    stage: Stage,
    created_at: DateTime<Utc>,
    last_stage_changed_at: DateTime<Utc>,
    content_ref: Option<ContentRef>,
    external_ref: Option<ExternalRef>,
    priority_score: i64,
    sla_deadline_at: Option<DateTime<Utc>>,
    archived_at: Option<DateTime<Utc>>,
    version: u64,
}

/// Parameter object for reconstructing a persisted work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedWorkItemData {
    /// Persisted identifier.
    pub id: WorkItemId,
    /// Persisted stage.
    pub stage: Stage,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted timestamp of the last accepted transition.
    pub last_stage_changed_at: DateTime<Utc>,
    /// Persisted locked script reference, if any.
    pub content_ref: Option<ContentRef>,
    /// Persisted posted artifact reference, if any.
    pub external_ref: Option<ExternalRef>,
    /// Persisted priority score.
    pub priority_score: i64,
    /// Persisted explicit SLA deadline, if any.
    pub sla_deadline_at: Option<DateTime<Utc>>,
    /// Persisted archive marker, if any.
    pub archived_at: Option<DateTime<Utc>>,
    /// Persisted optimistic-concurrency version.
    pub version: u64,
}

impl WorkItem {
    /// Creates a new work item in the initial `NeedsScript` stage.
    #[must_use]
    pub fn new(clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: WorkItemId::new(),
            stage: Stage::NeedsScript,
            created_at: timestamp,
            last_stage_changed_at: timestamp,
            content_ref: None,
            external_ref: None,
            priority_score: 0,
            sla_deadline_at: None,
            archived_at: None,
            version: 0,
        }
    }

    /// Sets the initial priority score.
    #[must_use]
    pub const fn with_priority_score(mut self, priority_score: i64) -> Self {
        self.priority_score = priority_score;
        self
    }

    /// Sets an explicit SLA deadline.
    #[must_use]
    pub const fn with_sla_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.sla_deadline_at = Some(deadline);
        self
    }

    /// Reconstructs a work item from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWorkItemData) -> Self {
        Self {
            id: data.id,
            stage: data.stage,
            created_at: data.created_at,
            last_stage_changed_at: data.last_stage_changed_at,
            content_ref: data.content_ref,
            external_ref: data.external_ref,
            priority_score: data.priority_score,
            sla_deadline_at: data.sla_deadline_at,
            archived_at: data.archived_at,
            version: data.version,
        }
    }

    /// Returns the work item identifier.
    #[must_use]
    pub const fn id(&self) -> WorkItemId {
        self.id
    }

    /// Returns the current stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the timestamp of the last accepted transition.
    #[must_use]
    pub const fn last_stage_changed_at(&self) -> DateTime<Utc> {
        self.last_stage_changed_at
    }

    /// Returns the locked script reference, if any.
    #[must_use]
    pub const fn content_ref(&self) -> Option<&ContentRef> {
        self.content_ref.as_ref()
    }

    /// Returns the posted artifact reference, if any.
    #[must_use]
    pub const fn external_ref(&self) -> Option<&ExternalRef> {
        self.external_ref.as_ref()
    }

    /// Returns the priority score used for queue ordering.
    #[must_use]
    pub const fn priority_score(&self) -> i64 {
        self.priority_score
    }

    /// Returns the explicit SLA deadline, if any.
    #[must_use]
    pub const fn sla_deadline_at(&self) -> Option<DateTime<Utc>> {
        self.sla_deadline_at
    }

    /// Returns the archive timestamp, if the item has been archived.
    #[must_use]
    pub const fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.archived_at
    }

    /// Returns `true` when the item carries the archived marker.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Returns the optimistic-concurrency version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns `true` when a locked script reference is attached.
    #[must_use]
    pub const fn has_locked_script(&self) -> bool {
        self.content_ref.is_some()
    }

    /// Derives the SLA status at `now`. Never cached; always recomputed.
    #[must_use]
    pub fn sla_status(&self, now: DateTime<Utc>, config: &SlaConfig) -> SlaStatus {
        evaluate_sla(
            self.stage,
            Some(self.created_at),
            self.sla_deadline_at,
            now,
            config,
        )
    }

    /// Updates the priority score.
    pub const fn set_priority_score(&mut self, priority_score: i64) {
        self.priority_score = priority_score;
        self.version += 1;
    }

    /// Sets or clears the explicit SLA deadline.
    pub const fn set_sla_deadline(&mut self, deadline: Option<DateTime<Utc>>) {
        self.sla_deadline_at = deadline;
        self.version += 1;
    }

    /// Attaches and locks a script reference.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::ScriptNotApproved`] when the version is
    /// unapproved and no force flag is set,
    /// [`WorkflowDomainError::ScriptAlreadyLocked`] when a script is already
    /// locked and no overwrite flag is set, or
    /// [`WorkflowDomainError::ItemArchived`] for archived items.
    pub fn attach_script(
        &mut self,
        content: ContentRef,
        options: AttachOptions,
    ) -> Result<(), WorkflowDomainError> {
        self.ensure_not_archived()?;
        if !content.approved && !options.force_unapproved {
            return Err(WorkflowDomainError::ScriptNotApproved {
                item_id: self.id,
                script_id: content.script_id,
            });
        }
        if let Some(existing) = &self.content_ref
            && !options.overwrite
        {
            return Err(WorkflowDomainError::ScriptAlreadyLocked {
                item_id: self.id,
                existing: existing.script_id,
            });
        }
        self.content_ref = Some(content);
        self.version += 1;
        Ok(())
    }

    /// Applies a validated stage transition.
    ///
    /// Checks the workflow graph first, then the stage-specific
    /// preconditions, and only then mutates. A failed precondition leaves
    /// the aggregate untouched.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidTransition`] when the graph
    /// forbids the move, or the precondition-specific variants documented on
    /// [`WorkflowDomainError`].
    pub fn transition_to(
        &mut self,
        target: Stage,
        payload: &TransitionPayload,
        clock: &impl Clock,
    ) -> Result<(), WorkflowDomainError> {
        self.ensure_not_archived()?;
        if !self.stage.can_transition_to(target) {
            return Err(WorkflowDomainError::InvalidTransition {
                item_id: self.id,
                from: self.stage,
                to: target,
            });
        }
        self.check_preconditions(target, payload)?;

        if target == Stage::Posted
            && let Some(external_ref) = &payload.external_ref
        {
            self.external_ref = Some(external_ref.clone());
        }
        self.stage = target;
        self.last_stage_changed_at = clock.utc();
        self.version += 1;
        Ok(())
    }

    /// Marks the item archived. Returns `false` when already archived.
    pub fn archive(&mut self, clock: &impl Clock) -> bool {
        if self.archived_at.is_some() {
            return false;
        }
        self.archived_at = Some(clock.utc());
        self.version += 1;
        true
    }

    fn check_preconditions(
        &self,
        target: Stage,
        payload: &TransitionPayload,
    ) -> Result<(), WorkflowDomainError> {
        match target {
            // Leaving the scripting lane requires a locked script.
            Stage::NotRecorded
                if matches!(self.stage, Stage::NeedsScript | Stage::GeneratingScript)
                    && self.content_ref.is_none() =>
            {
                Err(WorkflowDomainError::MissingLockedScript { item_id: self.id })
            }
            Stage::ReadyToPost
                if !matches!(
                    self.stage,
                    Stage::Edited | Stage::ApprovedNeedsEdits | Stage::ReadyForReview
                ) =>
            {
                Err(WorkflowDomainError::InvalidApprovalPath {
                    item_id: self.id,
                    from: self.stage,
                })
            }
            Stage::Posted if payload.external_ref.is_none() => {
                Err(WorkflowDomainError::MissingArtifact { item_id: self.id })
            }
            Stage::Rejected
                if !payload
                    .rejection
                    .as_ref()
                    .is_some_and(super::Rejection::is_substantiated) =>
            {
                Err(WorkflowDomainError::MissingRejectionReason { item_id: self.id })
            }
            _ => Ok(()),
        }
    }

    const fn ensure_not_archived(&self) -> Result<(), WorkflowDomainError> {
        if self.archived_at.is_some() {
            return Err(WorkflowDomainError::ItemArchived { item_id: self.id });
        }
        Ok(())
    }
}
