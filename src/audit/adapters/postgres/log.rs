//! `PostgreSQL` implementation of the workflow event log.

use super::{
    models::{NewWorkflowEventRow, WorkflowEventRow},
    schema::workflow_events,
};
use crate::audit::{
    domain::{Actor, CorrelationId, EventType, WorkflowEvent, WorkflowEventId},
    ports::{AuditLogError, AuditLogResult, WorkflowEventLog},
};
use crate::workitem::domain::{Stage, WorkItemId};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by audit adapters.
pub type AuditPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed append-only event log.
#[derive(Debug, Clone)]
pub struct PostgresEventLog {
    pool: AuditPgPool,
}

impl PostgresEventLog {
    /// Creates a new event log from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: AuditPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AuditLogResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AuditLogResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AuditLogError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AuditLogError::persistence)?
    }
}

#[async_trait]
impl WorkflowEventLog for PostgresEventLog {
    async fn append(&self, event: &WorkflowEvent) -> AuditLogResult<()> {
        let row = to_new_row(event);
        self.run_blocking(move |connection| {
            diesel::insert_into(workflow_events::table)
                .values(&row)
                .execute(connection)
                .map_err(AuditLogError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn for_item(&self, item_id: WorkItemId) -> AuditLogResult<Vec<WorkflowEvent>> {
        self.run_blocking(move |connection| {
            let rows = workflow_events::table
                .filter(workflow_events::work_item_id.eq(item_id.into_inner()))
                .order(workflow_events::created_at.asc())
                .select(WorkflowEventRow::as_select())
                .load::<WorkflowEventRow>(connection)
                .map_err(AuditLogError::persistence)?;
            rows.into_iter().map(row_to_event).collect()
        })
        .await
    }
}

fn to_new_row(event: &WorkflowEvent) -> NewWorkflowEventRow {
    NewWorkflowEventRow {
        id: event.id.into_inner(),
        work_item_id: event.work_item_id.into_inner(),
        event_type: event.event_type.as_str().to_owned(),
        from_stage: event.from_stage.map(|stage| stage.as_str().to_owned()),
        to_stage: event.to_stage.map(|stage| stage.as_str().to_owned()),
        actor: event.actor.as_str().to_owned(),
        notes: event.notes.clone(),
        correlation_id: event.correlation_id.into_inner(),
        created_at: event.created_at,
    }
}

fn row_to_event(row: WorkflowEventRow) -> AuditLogResult<WorkflowEvent> {
    let event_type =
        EventType::try_from(row.event_type.as_str()).map_err(AuditLogError::persistence)?;
    let from_stage = row
        .from_stage
        .as_deref()
        .map(Stage::try_from)
        .transpose()
        .map_err(AuditLogError::persistence)?;
    let to_stage = row
        .to_stage
        .as_deref()
        .map(Stage::try_from)
        .transpose()
        .map_err(AuditLogError::persistence)?;
    let actor = Actor::try_from(row.actor.as_str()).map_err(AuditLogError::persistence)?;

    Ok(WorkflowEvent {
        id: WorkflowEventId::from_uuid(row.id),
        work_item_id: WorkItemId::from_uuid(row.work_item_id),
        event_type,
        from_stage,
        to_stage,
        actor,
        notes: row.notes,
        correlation_id: CorrelationId::from_uuid(row.correlation_id),
        created_at: row.created_at,
    })
}
