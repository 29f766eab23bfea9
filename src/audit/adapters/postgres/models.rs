//! Diesel row models for workflow event persistence.

use super::schema::workflow_events;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for workflow event records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = workflow_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkflowEventRow {
    /// Event identifier.
    pub id: uuid::Uuid,
    /// Work item the event concerns.
    pub work_item_id: uuid::Uuid,
    /// Kind of operation recorded.
    pub event_type: String,
    /// Stage before the operation.
    pub from_stage: Option<String>,
    /// Stage after the operation.
    pub to_stage: Option<String>,
    /// Actor attributed to the operation.
    pub actor: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Correlation identifier.
    pub correlation_id: uuid::Uuid,
    /// Record timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for workflow event records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workflow_events)]
pub struct NewWorkflowEventRow {
    /// Event identifier.
    pub id: uuid::Uuid,
    /// Work item the event concerns.
    pub work_item_id: uuid::Uuid,
    /// Kind of operation recorded.
    pub event_type: String,
    /// Stage before the operation.
    pub from_stage: Option<String>,
    /// Stage after the operation.
    pub to_stage: Option<String>,
    /// Actor attributed to the operation.
    pub actor: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Correlation identifier.
    pub correlation_id: uuid::Uuid,
    /// Record timestamp.
    pub created_at: DateTime<Utc>,
}
