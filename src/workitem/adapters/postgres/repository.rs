//! `PostgreSQL` repository implementation for work item storage.

use super::{
    models::{WorkItemChangeset, WorkItemRow},
    schema::work_items,
};
use crate::workitem::{
    domain::{ContentRef, ExternalRef, PersistedWorkItemData, Stage, WorkItem, WorkItemId},
    ports::{QueueFilter, WorkItemRepository, WorkItemRepositoryError, WorkItemRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by work item adapters.
pub type WorkItemPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed work item repository.
#[derive(Debug, Clone)]
pub struct PostgresWorkItemRepository {
    pool: WorkItemPgPool,
}

impl PostgresWorkItemRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: WorkItemPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> WorkItemRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> WorkItemRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(WorkItemRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(WorkItemRepositoryError::persistence)?
    }
}

#[async_trait]
impl WorkItemRepository for PostgresWorkItemRepository {
    async fn store(&self, item: &WorkItem) -> WorkItemRepositoryResult<()> {
        let item_id = item.id();
        let row = to_changeset(item)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(work_items::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        WorkItemRepositoryError::DuplicateItem(item_id)
                    }
                    _ => WorkItemRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(
        &self,
        item: &WorkItem,
        expected_version: u64,
    ) -> WorkItemRepositoryResult<()> {
        let item_id = item.id();
        let row = to_changeset(item)?;
        let expected =
            i64::try_from(expected_version).map_err(WorkItemRepositoryError::persistence)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                work_items::table
                    .filter(work_items::id.eq(item_id.into_inner()))
                    .filter(work_items::version.eq(expected)),
            )
            .set(&row)
            .execute(connection)
            .map_err(WorkItemRepositoryError::persistence)?;

            if updated == 1 {
                return Ok(());
            }
            // Zero rows: distinguish a missing item from a lost race.
            let exists = diesel::select(diesel::dsl::exists(
                work_items::table.filter(work_items::id.eq(item_id.into_inner())),
            ))
            .get_result::<bool>(connection)
            .map_err(WorkItemRepositoryError::persistence)?;
            if exists {
                Err(WorkItemRepositoryError::VersionConflict(item_id))
            } else {
                Err(WorkItemRepositoryError::NotFound(item_id))
            }
        })
        .await
    }

    async fn find_by_id(&self, id: WorkItemId) -> WorkItemRepositoryResult<Option<WorkItem>> {
        self.run_blocking(move |connection| {
            let row = work_items::table
                .filter(work_items::id.eq(id.into_inner()))
                .select(WorkItemRow::as_select())
                .first::<WorkItemRow>(connection)
                .optional()
                .map_err(WorkItemRepositoryError::persistence)?;
            row.map(row_to_item).transpose()
        })
        .await
    }

    async fn list(&self, filter: &QueueFilter) -> WorkItemRepositoryResult<Vec<WorkItem>> {
        let list_filter = *filter;
        self.run_blocking(move |connection| {
            let mut query = work_items::table
                .select(WorkItemRow::as_select())
                .order((
                    work_items::priority_score.desc(),
                    work_items::created_at.asc(),
                    work_items::id.asc(),
                ))
                .into_boxed();
            if let Some(stage) = list_filter.stage {
                query = query.filter(work_items::stage.eq(stage.as_str()));
            }
            if !list_filter.include_archived {
                query = query.filter(work_items::archived_at.is_null());
            }
            if let Some(limit) = list_filter.limit {
                let capped = i64::try_from(limit).map_err(WorkItemRepositoryError::persistence)?;
                query = query.limit(capped);
            }
            let rows = query
                .load::<WorkItemRow>(connection)
                .map_err(WorkItemRepositoryError::persistence)?;
            rows.into_iter().map(row_to_item).collect()
        })
        .await
    }
}

fn to_changeset(item: &WorkItem) -> WorkItemRepositoryResult<WorkItemChangeset> {
    let content_ref = item
        .content_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(WorkItemRepositoryError::persistence)?;
    let external_ref = item
        .external_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(WorkItemRepositoryError::persistence)?;
    let version = i64::try_from(item.version()).map_err(WorkItemRepositoryError::persistence)?;

    Ok(WorkItemChangeset {
        id: item.id().into_inner(),
        stage: item.stage().as_str().to_owned(),
        created_at: item.created_at(),
        last_stage_changed_at: item.last_stage_changed_at(),
        content_ref,
        external_ref,
        priority_score: item.priority_score(),
        sla_deadline_at: item.sla_deadline_at(),
        archived_at: item.archived_at(),
        version,
    })
}

fn row_to_item(row: WorkItemRow) -> WorkItemRepositoryResult<WorkItem> {
    let stage =
        Stage::try_from(row.stage.as_str()).map_err(WorkItemRepositoryError::persistence)?;
    let content_ref = row
        .content_ref
        .map(serde_json::from_value::<ContentRef>)
        .transpose()
        .map_err(WorkItemRepositoryError::persistence)?;
    let external_ref = row
        .external_ref
        .map(serde_json::from_value::<ExternalRef>)
        .transpose()
        .map_err(WorkItemRepositoryError::persistence)?;
    let version = u64::try_from(row.version).map_err(WorkItemRepositoryError::persistence)?;

    Ok(WorkItem::from_persisted(PersistedWorkItemData {
        id: WorkItemId::from_uuid(row.id),
        stage,
        created_at: row.created_at,
        last_stage_changed_at: row.last_stage_changed_at,
        content_ref,
        external_ref,
        priority_score: row.priority_score,
        sla_deadline_at: row.sla_deadline_at,
        archived_at: row.archived_at,
        version,
    }))
}
