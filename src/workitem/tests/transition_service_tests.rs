//! Service orchestration tests for transitions, attachment, and archival.

use std::sync::Arc;

use crate::audit::{
    adapters::InMemoryEventLog,
    domain::{Actor, CorrelationId, EventType},
    ports::WorkflowEventLog,
};
use crate::lease::domain::ActorId;
use crate::workitem::{
    adapters::memory::InMemoryWorkItemRepository,
    domain::{
        AttachOptions, ContentRef, Rejection, ScriptId, Stage, TransitionPayload, WorkItem,
        WorkItemId,
    },
    ports::{WorkItemRepository, WorkItemRepositoryError},
    services::{ApplyTransitionRequest, AttachScriptRequest, TransitionError, TransitionService},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = TransitionService<InMemoryWorkItemRepository, InMemoryEventLog, DefaultClock>;

struct Harness {
    service: TestService,
    items: Arc<InMemoryWorkItemRepository>,
    audit: Arc<InMemoryEventLog>,
    clock: Arc<DefaultClock>,
}

#[fixture]
fn harness() -> Harness {
    let items = Arc::new(InMemoryWorkItemRepository::new());
    let audit = Arc::new(InMemoryEventLog::new());
    let clock = Arc::new(DefaultClock);
    Harness {
        service: TransitionService::new(Arc::clone(&items), Arc::clone(&audit), Arc::clone(&clock)),
        items,
        audit,
        clock,
    }
}

fn editor() -> Actor {
    Actor::Human(ActorId::new("editor-1").expect("valid actor id"))
}

async fn scripted_item(harness: &Harness) -> WorkItem {
    let item = harness.service.create().await.expect("create should succeed");
    harness
        .service
        .attach_script(AttachScriptRequest::new(
            item.id(),
            ContentRef::approved(ScriptId::new(), 1),
            editor(),
        ))
        .await
        .expect("attach should succeed")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_persists_a_fresh_item(harness: Harness) {
    let item = harness.service.create().await.expect("create should succeed");

    let stored = harness
        .items
        .find_by_id(item.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(stored, Some(item));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn apply_persists_and_records_stage_change(harness: Harness) {
    let item = scripted_item(&harness).await;

    let updated = harness
        .service
        .apply(ApplyTransitionRequest::new(
            item.id(),
            Stage::NotRecorded,
            editor(),
        ))
        .await
        .expect("transition should succeed");

    assert_eq!(updated.stage(), Stage::NotRecorded);

    let events = harness
        .audit
        .for_item(item.id())
        .await
        .expect("history should load");
    let stage_changed = events
        .iter()
        .find(|event| event.event_type == EventType::StageChanged)
        .expect("a stage_changed event must be recorded");
    assert_eq!(stage_changed.from_stage, Some(Stage::NeedsScript));
    assert_eq!(stage_changed.to_stage, Some(Stage::NotRecorded));
    assert_eq!(stage_changed.actor, editor());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refused_transition_records_no_event(harness: Harness) {
    let item = harness.service.create().await.expect("create should succeed");

    let result = harness
        .service
        .apply(ApplyTransitionRequest::new(
            item.id(),
            Stage::NotRecorded,
            editor(),
        ))
        .await;

    assert!(matches!(result, Err(TransitionError::Domain(_))));
    let events = harness
        .audit
        .for_item(item.id())
        .await
        .expect("history should load");
    assert!(
        events
            .iter()
            .all(|event| event.event_type != EventType::StageChanged)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejection_notes_land_in_the_event(harness: Harness) {
    let item = scripted_item(&harness).await;

    let payload =
        TransitionPayload::empty().with_rejection(Rejection::noted("audio out of sync"));
    harness
        .service
        .apply(ApplyTransitionRequest::new(item.id(), Stage::Rejected, editor()).with_payload(payload))
        .await
        .expect("rejection should succeed");

    let events = harness
        .audit
        .for_item(item.id())
        .await
        .expect("history should load");
    let rejected = events
        .iter()
        .find(|event| event.to_stage == Some(Stage::Rejected))
        .expect("rejection event must be recorded");
    assert_eq!(rejected.notes.as_deref(), Some("audio out of sync"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_write_loses_the_version_race(harness: Harness) {
    let item = scripted_item(&harness).await;

    // A competing writer commits first; the stored version moves on.
    let mut competing = item.clone();
    competing
        .transition_to(Stage::Recorded, &TransitionPayload::empty(), &*harness.clock)
        .expect("competing transition is valid");
    harness
        .items
        .update(&competing, item.version())
        .await
        .expect("competing update should succeed");

    let mut stale = item.clone();
    stale
        .transition_to(Stage::NotRecorded, &TransitionPayload::empty(), &*harness.clock)
        .expect("stale transition is valid in isolation");
    let result = harness.items.update(&stale, item.version()).await;

    assert!(matches!(
        result,
        Err(WorkItemRepositoryError::VersionConflict(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn apply_to_unknown_item_fails(harness: Harness) {
    let result = harness
        .service
        .apply(ApplyTransitionRequest::new(
            WorkItemId::new(),
            Stage::NotRecorded,
            editor(),
        ))
        .await;

    assert!(matches!(
        result,
        Err(TransitionError::Repository(
            WorkItemRepositoryError::NotFound(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn attach_script_records_event(harness: Harness) {
    let item = scripted_item(&harness).await;

    let events = harness
        .audit
        .for_item(item.id())
        .await
        .expect("history should load");
    assert!(
        events
            .iter()
            .any(|event| event.event_type == EventType::ScriptAttached)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn attach_refuses_double_lock_without_overwrite(harness: Harness) {
    let item = scripted_item(&harness).await;

    let result = harness
        .service
        .attach_script(AttachScriptRequest::new(
            item.id(),
            ContentRef::approved(ScriptId::new(), 2),
            editor(),
        ))
        .await;

    assert!(matches!(result, Err(TransitionError::Domain(_))));

    let overwrite = harness
        .service
        .attach_script(
            AttachScriptRequest::new(item.id(), ContentRef::approved(ScriptId::new(), 2), editor())
                .with_options(AttachOptions::new().overwrite()),
        )
        .await;
    assert!(overwrite.is_ok());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archive_records_one_event_and_is_idempotent(harness: Harness) {
    let item = harness.service.create().await.expect("create should succeed");

    harness
        .service
        .archive(item.id(), editor(), CorrelationId::new())
        .await
        .expect("archive should succeed");
    harness
        .service
        .archive(item.id(), editor(), CorrelationId::new())
        .await
        .expect("repeat archive should succeed");

    let events = harness
        .audit
        .for_item(item.id())
        .await
        .expect("history should load");
    let archived = events
        .iter()
        .filter(|event| event.event_type == EventType::Archived)
        .count();
    assert_eq!(archived, 1);
}
