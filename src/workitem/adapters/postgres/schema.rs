//! Diesel schema for work item persistence.

diesel::table! {
    /// Work item records.
    work_items (id) {
        /// Work item identifier.
        id -> Uuid,
        /// Production stage.
        #[max_length = 50]
        stage -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Timestamp of the last accepted transition.
        last_stage_changed_at -> Timestamptz,
        /// Locked script reference payload.
        content_ref -> Nullable<Jsonb>,
        /// Posted artifact reference payload.
        external_ref -> Nullable<Jsonb>,
        /// Priority score for queue ordering.
        priority_score -> Int8,
        /// Explicit SLA deadline.
        sla_deadline_at -> Nullable<Timestamptz>,
        /// Archive marker.
        archived_at -> Nullable<Timestamptz>,
        /// Optimistic-concurrency version.
        version -> Int8,
    }
}
