//! `PostgreSQL` repository implementation for lease storage.
//!
//! Every mutating operation is a single guarded statement, so the unique
//! primary key on `work_item_id` plus the expiry predicate give per-item
//! atomicity without explicit row locking: racing claims conflict on the
//! insert and exactly one wins.

use super::{
    models::{LeaseRow, NewLeaseRow},
    schema::leases,
};
use crate::lease::{
    domain::{ActorId, HolderRole, Lease},
    ports::{LeaseRepository, LeaseRepositoryError, LeaseRepositoryResult, ReleaseOutcome},
};
use crate::workitem::domain::WorkItemId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by lease adapters.
pub type LeasePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed lease repository.
#[derive(Debug, Clone)]
pub struct PostgresLeaseRepository {
    pool: LeasePgPool,
}

impl PostgresLeaseRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: LeasePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> LeaseRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> LeaseRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(LeaseRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(LeaseRepositoryError::persistence)?
    }
}

#[async_trait]
impl LeaseRepository for PostgresLeaseRepository {
    async fn claim(&self, lease: &Lease, now: DateTime<Utc>) -> LeaseRepositoryResult<()> {
        let row = to_new_row(lease);
        let item_uuid = lease.work_item_id.into_inner();

        self.run_blocking(move |connection| {
            // Clear an expired row first so the insert below only conflicts
            // with a live lease.
            diesel::delete(
                leases::table
                    .filter(leases::work_item_id.eq(item_uuid))
                    .filter(leases::expires_at.le(now)),
            )
            .execute(connection)
            .map_err(LeaseRepositoryError::persistence)?;

            let inserted = diesel::insert_into(leases::table)
                .values(&row)
                .on_conflict_do_nothing()
                .execute(connection)
                .map_err(LeaseRepositoryError::persistence)?;
            if inserted == 1 {
                return Ok(());
            }

            let existing = find_row(connection, item_uuid)?
                .map(row_to_lease)
                .transpose()?;
            existing.map_or(
                // The conflicting lease vanished between statements; the
                // caller retries against fresh state.
                Err(LeaseRepositoryError::persistence(std::io::Error::other(
                    "lease row vanished during claim",
                ))),
                |lease_row| Err(LeaseRepositoryError::AlreadyClaimed {
                    existing: lease_row,
                }),
            )
        })
        .await
    }

    async fn find_by_item(&self, item_id: WorkItemId) -> LeaseRepositoryResult<Option<Lease>> {
        self.run_blocking(move |connection| {
            find_row(connection, item_id.into_inner())?
                .map(row_to_lease)
                .transpose()
        })
        .await
    }

    async fn release(
        &self,
        item_id: WorkItemId,
        actor: &ActorId,
        now: DateTime<Utc>,
    ) -> LeaseRepositoryResult<ReleaseOutcome> {
        let item_uuid = item_id.into_inner();
        let actor_value = actor.clone();

        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                leases::table
                    .filter(leases::work_item_id.eq(item_uuid))
                    .filter(leases::holder.eq(actor_value.as_str()))
                    .filter(leases::expires_at.gt(now)),
            )
            .execute(connection)
            .map_err(LeaseRepositoryError::persistence)?;
            if removed == 1 {
                return Ok(ReleaseOutcome::Released);
            }

            // Nothing was removed: classify the refusal.
            let live_holder = find_row(connection, item_uuid)?
                .filter(|row| row.expires_at > now)
                .map(|row| row.holder);
            match live_holder {
                Some(holder) if holder != actor_value.as_str() => {
                    Err(LeaseRepositoryError::NotHolder {
                        item_id,
                        actor: actor_value,
                    })
                }
                _ => Ok(ReleaseOutcome::NoLiveLease),
            }
        })
        .await
    }

    async fn replace(
        &self,
        item_id: WorkItemId,
        from: &ActorId,
        replacement: &Lease,
        now: DateTime<Utc>,
    ) -> LeaseRepositoryResult<()> {
        let row = to_new_row(replacement);
        let item_uuid = item_id.into_inner();
        let from_value = from.clone();

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                leases::table
                    .filter(leases::work_item_id.eq(item_uuid))
                    .filter(leases::holder.eq(from_value.as_str()))
                    .filter(leases::expires_at.gt(now)),
            )
            .set((
                leases::holder.eq(row.holder),
                leases::holder_role.eq(row.holder_role),
                leases::granted_at.eq(row.granted_at),
                leases::expires_at.eq(row.expires_at),
            ))
            .execute(connection)
            .map_err(LeaseRepositoryError::persistence)?;
            if updated == 1 {
                Ok(())
            } else {
                Err(LeaseRepositoryError::NotHolder {
                    item_id,
                    actor: from_value,
                })
            }
        })
        .await
    }

    async fn renew(
        &self,
        item_id: WorkItemId,
        actor: &ActorId,
        new_expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> LeaseRepositoryResult<Lease> {
        let item_uuid = item_id.into_inner();
        let actor_value = actor.clone();

        self.run_blocking(move |connection| {
            let renewed = diesel::update(
                leases::table
                    .filter(leases::work_item_id.eq(item_uuid))
                    .filter(leases::holder.eq(actor_value.as_str()))
                    .filter(leases::expires_at.gt(now)),
            )
            .set(leases::expires_at.eq(new_expires_at))
            .get_result::<LeaseRow>(connection)
            .optional()
            .map_err(LeaseRepositoryError::persistence)?;
            renewed.map_or(
                Err(LeaseRepositoryError::NotHolder {
                    item_id,
                    actor: actor_value,
                }),
                row_to_lease,
            )
        })
        .await
    }

    async fn expired(&self, now: DateTime<Utc>) -> LeaseRepositoryResult<Vec<Lease>> {
        self.run_blocking(move |connection| {
            let rows = leases::table
                .filter(leases::expires_at.le(now))
                .select(LeaseRow::as_select())
                .load::<LeaseRow>(connection)
                .map_err(LeaseRepositoryError::persistence)?;
            rows.into_iter().map(row_to_lease).collect()
        })
        .await
    }

    async fn take_expired(
        &self,
        item_id: WorkItemId,
        now: DateTime<Utc>,
    ) -> LeaseRepositoryResult<Option<Lease>> {
        let item_uuid = item_id.into_inner();
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                leases::table
                    .filter(leases::work_item_id.eq(item_uuid))
                    .filter(leases::expires_at.le(now)),
            )
            .get_result::<LeaseRow>(connection)
            .optional()
            .map_err(LeaseRepositoryError::persistence)?;
            removed.map(row_to_lease).transpose()
        })
        .await
    }
}

fn find_row(
    connection: &mut PgConnection,
    item_uuid: uuid::Uuid,
) -> LeaseRepositoryResult<Option<LeaseRow>> {
    leases::table
        .filter(leases::work_item_id.eq(item_uuid))
        .select(LeaseRow::as_select())
        .first::<LeaseRow>(connection)
        .optional()
        .map_err(LeaseRepositoryError::persistence)
}

fn to_new_row(lease: &Lease) -> NewLeaseRow {
    NewLeaseRow {
        work_item_id: lease.work_item_id.into_inner(),
        holder: lease.holder.as_str().to_owned(),
        holder_role: lease.holder_role.as_str().to_owned(),
        granted_at: lease.granted_at,
        expires_at: lease.expires_at,
    }
}

fn row_to_lease(row: LeaseRow) -> LeaseRepositoryResult<Lease> {
    let holder = ActorId::new(row.holder).map_err(LeaseRepositoryError::persistence)?;
    let holder_role =
        HolderRole::try_from(row.holder_role.as_str()).map_err(LeaseRepositoryError::persistence)?;
    Ok(Lease {
        work_item_id: WorkItemId::from_uuid(row.work_item_id),
        holder,
        holder_role,
        granted_at: row.granted_at,
        expires_at: row.expires_at,
    })
}
