//! Queue projection tests over the in-memory adapters.

use std::sync::Arc;

use crate::config::SlaConfig;
use crate::lease::{
    adapters::memory::InMemoryLeaseRepository,
    domain::{ActorId, HolderRole, Lease},
    ports::LeaseRepository,
};
use crate::workitem::{
    adapters::memory::InMemoryWorkItemRepository,
    domain::{ActionKind, Stage, WorkItem, WorkItemId},
    ports::WorkItemRepository,
    services::{QueueQuery, QueueService},
};
use chrono::Duration;
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};

type TestService = QueueService<InMemoryWorkItemRepository, InMemoryLeaseRepository, DefaultClock>;

struct Harness {
    service: TestService,
    items: Arc<InMemoryWorkItemRepository>,
    leases: Arc<InMemoryLeaseRepository>,
    clock: Arc<DefaultClock>,
}

#[fixture]
fn harness() -> Harness {
    let items = Arc::new(InMemoryWorkItemRepository::new());
    let leases = Arc::new(InMemoryLeaseRepository::new());
    let clock = Arc::new(DefaultClock);
    Harness {
        service: QueueService::new(
            Arc::clone(&items),
            Arc::clone(&leases),
            SlaConfig::default(),
            Arc::clone(&clock),
        ),
        items,
        leases,
        clock,
    }
}

async fn store_item(harness: &Harness, priority: i64) -> WorkItem {
    let item = WorkItem::new(&*harness.clock).with_priority_score(priority);
    harness
        .items
        .store(&item)
        .await
        .expect("store should succeed");
    item
}

async fn claim_for(harness: &Harness, item_id: WorkItemId, actor: &str, hours: i64) -> Lease {
    let lease = Lease::grant(
        item_id,
        ActorId::new(actor).expect("valid actor id"),
        HolderRole::Recorder,
        Duration::hours(hours),
        &*harness.clock,
    );
    harness
        .leases
        .claim(&lease, harness.clock.utc())
        .await
        .expect("claim should succeed");
    lease
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn entries_are_ordered_by_priority_then_age(harness: Harness) {
    let low_old = store_item(&harness, 10).await;
    let low_new = store_item(&harness, 10).await;
    let high = store_item(&harness, 90).await;

    let entries = harness
        .service
        .list(QueueQuery::new())
        .await
        .expect("listing should succeed");

    let ids: Vec<WorkItemId> = entries.iter().map(|entry| entry.item.id()).collect();
    assert_eq!(ids, vec![high.id(), low_old.id(), low_new.id()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stage_filter_restricts_the_listing(harness: Harness) {
    let kept = store_item(&harness, 0).await;
    store_item(&harness, 0).await;

    let entries = harness
        .service
        .list(QueueQuery::new().with_stage(Stage::NeedsScript))
        .await
        .expect("listing should succeed");
    assert_eq!(entries.len(), 2);

    let entries = harness
        .service
        .list(QueueQuery::new().with_stage(Stage::Recorded))
        .await
        .expect("listing should succeed");
    assert!(entries.is_empty());
    drop(kept);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn claimed_filter_splits_on_live_leases(harness: Harness) {
    let claimed = store_item(&harness, 0).await;
    let unclaimed = store_item(&harness, 0).await;
    claim_for(&harness, claimed.id(), "recorder-1", 4).await;

    let live = harness
        .service
        .list(QueueQuery::new().with_claimed(true))
        .await
        .expect("listing should succeed");
    assert_eq!(live.len(), 1);
    assert_eq!(live.first().map(|entry| entry.item.id()), Some(claimed.id()));
    assert!(live.first().is_some_and(|entry| entry.lease.is_some()));

    let free = harness
        .service
        .list(QueueQuery::new().with_claimed(false))
        .await
        .expect("listing should succeed");
    assert_eq!(
        free.first().map(|entry| entry.item.id()),
        Some(unclaimed.id())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn expired_lease_reads_as_unclaimed(harness: Harness) {
    let item = store_item(&harness, 0).await;
    claim_for(&harness, item.id(), "recorder-1", -1).await;

    let free = harness
        .service
        .list(QueueQuery::new().with_claimed(false))
        .await
        .expect("listing should succeed");

    assert_eq!(free.len(), 1);
    assert!(free.first().is_some_and(|entry| entry.lease.is_none()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn limit_caps_entries_after_claim_filtering(harness: Harness) {
    let claimed = store_item(&harness, 99).await;
    store_item(&harness, 10).await;
    store_item(&harness, 5).await;
    claim_for(&harness, claimed.id(), "recorder-1", 4).await;

    let entries = harness
        .service
        .list(QueueQuery::new().with_claimed(false).with_limit(1))
        .await
        .expect("listing should succeed");

    // The highest-priority item is claimed; the limit applies to what is
    // left, not to the pre-filter listing.
    assert_eq!(entries.len(), 1);
    assert!(
        entries
            .first()
            .is_some_and(|entry| entry.item.priority_score() == 10)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn entries_carry_derived_action_and_sla(harness: Harness) {
    store_item(&harness, 0).await;

    let entries = harness
        .service
        .list(QueueQuery::new())
        .await
        .expect("listing should succeed");
    let entry = entries.first().expect("one entry expected");

    // A fresh item has no locked script, so attach-content leads.
    assert_eq!(entry.primary_action.action, ActionKind::AttachContent);
    assert_eq!(
        entry.sla_status,
        entry
            .item
            .sla_status(harness.clock.utc(), &SlaConfig::default())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archived_items_stay_out_of_the_queue(harness: Harness) {
    let mut item = WorkItem::new(&*harness.clock);
    let expected = item.version();
    harness
        .items
        .store(&item)
        .await
        .expect("store should succeed");
    assert!(item.archive(&*harness.clock));
    harness
        .items
        .update(&item, expected)
        .await
        .expect("update should succeed");

    let entries = harness
        .service
        .list(QueueQuery::new())
        .await
        .expect("listing should succeed");
    assert!(entries.is_empty());
}
