//! Diesel row models for lease persistence.

use super::schema::leases;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for lease records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = leases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LeaseRow {
    /// Claimed work item identifier.
    pub work_item_id: uuid::Uuid,
    /// Actor holding the claim.
    pub holder: String,
    /// Role under which the claim was made.
    pub holder_role: String,
    /// Grant timestamp.
    pub granted_at: DateTime<Utc>,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Insert model for lease records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = leases)]
pub struct NewLeaseRow {
    /// Claimed work item identifier.
    pub work_item_id: uuid::Uuid,
    /// Actor holding the claim.
    pub holder: String,
    /// Role under which the claim was made.
    pub holder_role: String,
    /// Grant timestamp.
    pub granted_at: DateTime<Utc>,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
}
