//! End-to-end integration tests for the workflow engine facade.
//!
//! Drives full production flows through the in-memory adapters: claiming,
//! script attachment, the happy path to posting, composite and bulk
//! operations, and the queue projection.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]
#![expect(
    clippy::cognitive_complexity,
    reason = "Test functions may have higher complexity for full scenario coverage"
)]

use std::sync::Arc;

use cutroom::audit::adapters::InMemoryEventLog;
use cutroom::audit::domain::{Actor, EventType};
use cutroom::config::EngineConfig;
use cutroom::engine::{
    BulkArchiveRequest, BulkTransitionRequest, ClaimThenApplyRequest, EngineError, NewItemRequest,
    WorkflowEngine,
};
use cutroom::lease::adapters::memory::InMemoryLeaseRepository;
use cutroom::lease::domain::{ActorId, HolderRole};
use cutroom::lease::services::HandoffRequest;
use cutroom::workitem::adapters::memory::InMemoryWorkItemRepository;
use cutroom::workitem::domain::{
    ActionKind, ContentRef, ExternalRef, Rejection, ScriptId, SlaStatus, Stage, TransitionPayload,
    WorkItem,
};
use cutroom::workitem::services::{ApplyTransitionRequest, AttachScriptRequest, QueueQuery};
use mockable::DefaultClock;

type TestEngine = WorkflowEngine<
    InMemoryWorkItemRepository,
    InMemoryLeaseRepository,
    InMemoryEventLog,
    DefaultClock,
>;

fn engine() -> TestEngine {
    WorkflowEngine::new(
        Arc::new(InMemoryWorkItemRepository::new()),
        Arc::new(InMemoryLeaseRepository::new()),
        Arc::new(InMemoryEventLog::new()),
        EngineConfig::default(),
        Arc::new(DefaultClock),
    )
}

fn actor(name: &str) -> ActorId {
    ActorId::new(name).expect("valid actor id")
}

fn human(name: &str) -> Actor {
    Actor::Human(actor(name))
}

async fn scripted_item(engine: &TestEngine) -> WorkItem {
    let item = engine
        .create_item(NewItemRequest::new())
        .await
        .expect("item creation should succeed");
    engine
        .attach_script(AttachScriptRequest::new(
            item.id(),
            ContentRef::approved(ScriptId::new(), 1),
            human("recorder-1"),
        ))
        .await
        .expect("script attachment should succeed")
}

#[tokio::test(flavor = "multi_thread")]
async fn full_happy_path_from_script_to_posted() {
    let engine = engine();
    let item = scripted_item(&engine).await;

    engine
        .claim(item.id(), actor("recorder-1"), HolderRole::Recorder)
        .await
        .expect("claim should succeed");

    for stage in [Stage::NotRecorded, Stage::Recorded, Stage::Edited, Stage::ReadyToPost] {
        engine
            .transition(ApplyTransitionRequest::new(
                item.id(),
                stage,
                human("recorder-1"),
            ))
            .await
            .expect("transition should succeed");
    }

    let artifact = ExternalRef::new("https://example.test/v/42", "shorts")
        .expect("valid artifact reference");
    let posted = engine
        .transition(
            ApplyTransitionRequest::new(item.id(), Stage::Posted, human("uploader-1"))
                .with_payload(TransitionPayload::empty().with_external_ref(artifact.clone())),
        )
        .await
        .expect("posting should succeed");

    assert_eq!(posted.stage(), Stage::Posted);
    assert_eq!(posted.external_ref(), Some(&artifact));

    let history = engine
        .history(item.id())
        .await
        .expect("history should load");
    let stage_changes = history
        .iter()
        .filter(|event| event.event_type == EventType::StageChanged)
        .count();
    assert_eq!(stage_changes, 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn handoff_passes_work_between_lanes() {
    let engine = engine();
    let item = scripted_item(&engine).await;
    engine
        .claim(item.id(), actor("recorder-1"), HolderRole::Recorder)
        .await
        .expect("claim should succeed");

    let replacement = engine
        .handoff(
            HandoffRequest::new(
                item.id(),
                actor("recorder-1"),
                actor("editor-1"),
                HolderRole::Editor,
            )
            .with_notes("cut is ready"),
        )
        .await
        .expect("handoff should succeed");

    assert!(replacement.is_held_by(&actor("editor-1")));
    assert_eq!(replacement.holder_role, HolderRole::Editor);
}

#[tokio::test(flavor = "multi_thread")]
async fn claim_then_apply_shares_one_correlation() {
    let engine = engine();
    let item = scripted_item(&engine).await;

    let outcome = engine
        .claim_then_apply(ClaimThenApplyRequest::new(
            item.id(),
            actor("recorder-1"),
            HolderRole::Recorder,
            Stage::NotRecorded,
        ))
        .await
        .expect("claim-then-apply should succeed");

    assert_eq!(outcome.item.stage(), Stage::NotRecorded);

    let history = engine
        .history(item.id())
        .await
        .expect("history should load");
    let claimed = history
        .iter()
        .find(|event| event.event_type == EventType::Claimed)
        .expect("claim event must exist");
    let moved = history
        .iter()
        .find(|event| event.to_stage == Some(Stage::NotRecorded))
        .expect("stage change event must exist");
    assert_eq!(claimed.correlation_id, moved.correlation_id);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_claim_then_apply_releases_the_claim() {
    let engine = engine();
    // No script locked, so entering the recording lane is refused.
    let item = engine
        .create_item(NewItemRequest::new())
        .await
        .expect("item creation should succeed");

    let result = engine
        .claim_then_apply(ClaimThenApplyRequest::new(
            item.id(),
            actor("recorder-1"),
            HolderRole::Recorder,
            Stage::NotRecorded,
        ))
        .await;
    assert!(matches!(result, Err(EngineError::Transition(_))));

    // The item is free again for the next claimant.
    let lease = engine
        .claim(item.id(), actor("recorder-2"), HolderRole::Recorder)
        .await
        .expect("item should be claimable after rollback");
    assert!(lease.is_held_by(&actor("recorder-2")));
}

#[tokio::test(flavor = "multi_thread")]
async fn bulk_transition_collects_per_item_failures() {
    let engine = engine();
    let movable_a = scripted_item(&engine).await;
    let movable_b = scripted_item(&engine).await;
    let stuck = engine
        .create_item(NewItemRequest::new())
        .await
        .expect("item creation should succeed");

    let outcome = engine
        .bulk_transition(BulkTransitionRequest::new(
            vec![movable_a.id(), movable_b.id(), stuck.id()],
            Stage::NotRecorded,
            human("admin-1"),
        ))
        .await;

    assert_eq!(
        outcome.applied.iter().map(WorkItem::id).collect::<Vec<_>>(),
        vec![movable_a.id(), movable_b.id()]
    );
    assert_eq!(
        outcome
            .failures
            .iter()
            .map(|failure| failure.item_id)
            .collect::<Vec<_>>(),
        vec![stuck.id()]
    );

    // The per-item events of one batch share one correlation.
    let engine_ref = &engine;
    let correlation_of = |item_id| async move {
        engine_ref
            .history(item_id)
            .await
            .expect("history should load")
            .into_iter()
            .find(|event| event.to_stage == Some(Stage::NotRecorded))
            .expect("stage change event must exist")
            .correlation_id
    };
    assert_eq!(
        correlation_of(movable_a.id()).await,
        correlation_of(movable_b.id()).await
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn bulk_reject_requires_a_substantiated_reason() {
    let engine = engine();
    let item = scripted_item(&engine).await;

    let refused = engine
        .bulk_transition(BulkTransitionRequest::new(
            vec![item.id()],
            Stage::Rejected,
            human("admin-1"),
        ))
        .await;
    assert!(refused.applied.is_empty());

    let accepted = engine
        .bulk_transition(
            BulkTransitionRequest::new(vec![item.id()], Stage::Rejected, human("admin-1"))
                .with_payload(
                    TransitionPayload::empty().with_rejection(Rejection::noted("off brand")),
                ),
        )
        .await;
    assert_eq!(accepted.applied.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn bulk_archive_respects_foreign_leases_unless_overridden() {
    let engine = engine();
    let held = scripted_item(&engine).await;
    let free = engine
        .create_item(NewItemRequest::new())
        .await
        .expect("item creation should succeed");
    engine
        .claim(held.id(), actor("recorder-1"), HolderRole::Recorder)
        .await
        .expect("claim should succeed");

    let outcome = engine
        .bulk_archive(BulkArchiveRequest::new(
            vec![held.id(), free.id()],
            actor("admin-1"),
        ))
        .await;

    assert_eq!(outcome.archived, vec![free.id()]);
    assert!(matches!(
        outcome.failures.first(),
        Some(failure) if matches!(failure.error, EngineError::HeldByOther(_))
    ));

    let forced = engine
        .bulk_archive(BulkArchiveRequest::new(vec![held.id()], actor("admin-1")).with_override())
        .await;
    assert_eq!(forced.archived, vec![held.id()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn queue_projection_joins_items_leases_and_actions() {
    let engine = engine();
    let claimed = scripted_item(&engine).await;
    let fresh = engine
        .create_item(NewItemRequest::new().with_priority_score(10))
        .await
        .expect("item creation should succeed");
    engine
        .claim(claimed.id(), actor("recorder-1"), HolderRole::Recorder)
        .await
        .expect("claim should succeed");

    let entries = engine
        .queue(QueueQuery::new())
        .await
        .expect("listing should succeed");
    assert_eq!(entries.len(), 2);

    let first = entries.first().expect("two entries expected");
    assert_eq!(first.item.id(), fresh.id());
    assert_eq!(first.primary_action.action, ActionKind::AttachContent);
    assert_eq!(first.sla_status, SlaStatus::OnTrack);
    assert!(first.lease.is_none());

    let second = entries.get(1).expect("two entries expected");
    assert_eq!(second.item.id(), claimed.id());
    assert!(second.lease.is_some());
}
