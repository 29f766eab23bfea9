//! Concurrency integration tests for the claim path.
//!
//! Races many claimants at one work item through the engine and verifies
//! that the exclusivity invariant holds: exactly one winner, every loser
//! told who holds the item.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use std::sync::Arc;

use cutroom::audit::adapters::InMemoryEventLog;
use cutroom::config::{EngineConfig, LeaseConfig, SlaConfig};
use cutroom::engine::{EngineError, NewItemRequest, WorkflowEngine};
use cutroom::lease::adapters::memory::InMemoryLeaseRepository;
use cutroom::lease::domain::{ActorId, HolderRole};
use cutroom::lease::ports::LeaseRepositoryError;
use cutroom::lease::services::LeaseManagerError;
use cutroom::workitem::adapters::memory::InMemoryWorkItemRepository;
use mockable::DefaultClock;

type TestEngine = WorkflowEngine<
    InMemoryWorkItemRepository,
    InMemoryLeaseRepository,
    InMemoryEventLog,
    DefaultClock,
>;

fn engine_with(config: EngineConfig) -> TestEngine {
    WorkflowEngine::new(
        Arc::new(InMemoryWorkItemRepository::new()),
        Arc::new(InMemoryLeaseRepository::new()),
        Arc::new(InMemoryEventLog::new()),
        config,
        Arc::new(DefaultClock),
    )
}

fn actor(name: &str) -> ActorId {
    ActorId::new(name).expect("valid actor id")
}

#[tokio::test(flavor = "multi_thread")]
async fn racing_claimants_yield_exactly_one_winner() {
    let engine = Arc::new(engine_with(EngineConfig::default()));
    let item = engine
        .create_item(NewItemRequest::new())
        .await
        .expect("item creation should succeed");

    let mut handles = Vec::new();
    for index in 0..16_u32 {
        let racer = Arc::clone(&engine);
        let item_id = item.id();
        handles.push(tokio::spawn(async move {
            racer
                .claim(item_id, actor(&format!("recorder-{index}")), HolderRole::Recorder)
                .await
        }));
    }

    let mut winners = 0_usize;
    let mut losers = 0_usize;
    for handle in handles {
        match handle.await.expect("task should not panic") {
            Ok(lease) => {
                winners += 1;
                assert_eq!(lease.work_item_id, item.id());
            }
            Err(EngineError::Lease(LeaseManagerError::Repository(
                LeaseRepositoryError::AlreadyClaimed { existing },
            ))) => {
                losers += 1;
                // Losers learn who holds the item.
                assert_eq!(existing.work_item_id, item.id());
            }
            Err(other) => panic!("unexpected claim failure: {other}"),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(losers, 15);
}

#[tokio::test(flavor = "multi_thread")]
async fn expired_lease_frees_the_item_for_the_next_claimant() {
    // A negative lease window grants claims that are already expired.
    let engine = engine_with(EngineConfig::new(LeaseConfig::new(-1), SlaConfig::default()));
    let item = engine
        .create_item(NewItemRequest::new())
        .await
        .expect("item creation should succeed");

    engine
        .claim(item.id(), actor("recorder-1"), HolderRole::Recorder)
        .await
        .expect("first claim should succeed");

    let second = engine
        .claim(item.id(), actor("recorder-2"), HolderRole::Recorder)
        .await
        .expect("claim over expired lease should succeed");
    assert!(second.is_held_by(&actor("recorder-2")));
}

#[tokio::test(flavor = "multi_thread")]
async fn reaper_sweeps_are_idempotent_through_the_engine() {
    let engine = engine_with(EngineConfig::new(LeaseConfig::new(-1), SlaConfig::default()));
    for _ in 0..3 {
        let item = engine
            .create_item(NewItemRequest::new())
            .await
            .expect("item creation should succeed");
        engine
            .claim(item.id(), actor("recorder-1"), HolderRole::Recorder)
            .await
            .expect("claim should succeed");
    }

    let first = engine
        .release_stale()
        .await
        .expect("first sweep should succeed");
    let second = engine
        .release_stale()
        .await
        .expect("second sweep should succeed");

    assert_eq!(first, 3);
    assert_eq!(second, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn claims_on_archived_items_are_refused() {
    let engine = engine_with(EngineConfig::default());
    let item = engine
        .create_item(NewItemRequest::new())
        .await
        .expect("item creation should succeed");

    let outcome = engine
        .bulk_archive(cutroom::engine::BulkArchiveRequest::new(
            vec![item.id()],
            actor("admin-1"),
        ))
        .await;
    assert_eq!(outcome.archived, vec![item.id()]);

    let result = engine
        .claim(item.id(), actor("recorder-1"), HolderRole::Recorder)
        .await;
    assert!(matches!(result, Err(EngineError::ItemArchived(_))));
}
