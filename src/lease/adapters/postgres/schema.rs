//! Diesel schema for lease persistence.

diesel::table! {
    /// Lease rows, at most one per work item.
    leases (work_item_id) {
        /// Claimed work item identifier.
        work_item_id -> Uuid,
        /// Actor holding the claim.
        #[max_length = 255]
        holder -> Varchar,
        /// Role under which the claim was made.
        #[max_length = 50]
        holder_role -> Varchar,
        /// Grant timestamp.
        granted_at -> Timestamptz,
        /// Expiry timestamp.
        expires_at -> Timestamptz,
    }
}
