//! Diesel schema for workflow event persistence.

diesel::table! {
    /// Append-only workflow event records.
    workflow_events (id) {
        /// Event identifier.
        id -> Uuid,
        /// Work item the event concerns.
        work_item_id -> Uuid,
        /// Kind of operation recorded.
        #[max_length = 50]
        event_type -> Varchar,
        /// Stage before the operation.
        #[max_length = 50]
        from_stage -> Nullable<Varchar>,
        /// Stage after the operation.
        #[max_length = 50]
        to_stage -> Nullable<Varchar>,
        /// Actor attributed to the operation.
        #[max_length = 255]
        actor -> Varchar,
        /// Free-text notes.
        notes -> Nullable<Text>,
        /// Correlation identifier grouping one logical operation.
        correlation_id -> Uuid,
        /// Record timestamp.
        created_at -> Timestamptz,
    }
}
