//! The lease value type and the single liveness predicate.

use super::{ActorId, HolderRole};
use crate::workitem::domain::WorkItemId;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Exclusive, time-boxed claim on a work item.
///
/// A lease past its expiry is logically absent even if the row still exists:
/// every reader must go through [`Lease::is_live`] rather than re-deriving
/// the comparison, so there is no stored "claimed" flag to drift from the
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lease {
    /// The work item this lease claims.
    pub work_item_id: WorkItemId,
    /// Actor holding the claim.
    pub holder: ActorId,
    /// Role under which the claim was made.
    pub holder_role: HolderRole,
    /// When the lease was granted.
    pub granted_at: DateTime<Utc>,
    /// When the lease expires. The boundary is inclusive: a lease whose
    /// expiry equals `now` is expired.
    pub expires_at: DateTime<Utc>,
}

impl Lease {
    /// Grants a fresh lease valid for `duration` from the current clock time.
    #[must_use]
    pub fn grant(
        work_item_id: WorkItemId,
        holder: ActorId,
        holder_role: HolderRole,
        duration: Duration,
        clock: &impl Clock,
    ) -> Self {
        let granted_at = clock.utc();
        Self {
            work_item_id,
            holder,
            holder_role,
            granted_at,
            expires_at: granted_at + duration,
        }
    }

    /// Returns `true` while the lease confers an exclusive claim.
    ///
    /// This is the only liveness check in the engine; claim attempts, list
    /// projections, and the reaper all call it with their own `now`.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Returns a copy of this lease extended to `duration` from `now`.
    ///
    /// Renewal is the only in-place mutation the lease lifecycle permits,
    /// and it only ever moves `expires_at`.
    #[must_use]
    pub fn renewed(&self, duration: Duration, clock: &impl Clock) -> Self {
        Self {
            expires_at: clock.utc() + duration,
            ..self.clone()
        }
    }

    /// Returns `true` when `actor` holds this lease.
    #[must_use]
    pub fn is_held_by(&self, actor: &ActorId) -> bool {
        &self.holder == actor
    }
}
