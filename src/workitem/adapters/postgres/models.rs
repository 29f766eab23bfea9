//! Diesel row models for work item persistence.

use super::schema::work_items;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for work item records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = work_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkItemRow {
    /// Work item identifier.
    pub id: uuid::Uuid,
    /// Production stage.
    pub stage: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last accepted transition.
    pub last_stage_changed_at: DateTime<Utc>,
    /// Locked script reference payload.
    pub content_ref: Option<Value>,
    /// Posted artifact reference payload.
    pub external_ref: Option<Value>,
    /// Priority score for queue ordering.
    pub priority_score: i64,
    /// Explicit SLA deadline.
    pub sla_deadline_at: Option<DateTime<Utc>>,
    /// Archive marker.
    pub archived_at: Option<DateTime<Utc>>,
    /// Optimistic-concurrency version.
    pub version: i64,
}

/// Insert and update model for work item records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = work_items)]
#[diesel(treat_none_as_null = true)]
pub struct WorkItemChangeset {
    /// Work item identifier.
    pub id: uuid::Uuid,
    /// Production stage.
    pub stage: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last accepted transition.
    pub last_stage_changed_at: DateTime<Utc>,
    /// Locked script reference payload.
    pub content_ref: Option<Value>,
    /// Posted artifact reference payload.
    pub external_ref: Option<Value>,
    /// Priority score for queue ordering.
    pub priority_score: i64,
    /// Explicit SLA deadline.
    pub sla_deadline_at: Option<DateTime<Utc>>,
    /// Archive marker.
    pub archived_at: Option<DateTime<Utc>>,
    /// Optimistic-concurrency version.
    pub version: i64,
}
