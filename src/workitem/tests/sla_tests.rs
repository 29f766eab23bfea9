//! Unit tests for pure SLA deadline evaluation.

use crate::config::SlaConfig;
use crate::workitem::domain::{SlaStatus, Stage, evaluate_sla};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rstest::{fixture, rstest};

#[fixture]
fn config() -> SlaConfig {
    SlaConfig::default()
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
        .single()
        .expect("fixed timestamp is valid")
}

#[rstest]
fn delivered_stages_are_always_on_track(config: SlaConfig) {
    let long_past_deadline = t0() - Duration::days(30);
    for stage in [Stage::Posted, Stage::ReadyToPost] {
        assert_eq!(
            evaluate_sla(stage, Some(t0()), Some(long_past_deadline), t0(), &config),
            SlaStatus::OnTrack
        );
    }
}

#[rstest]
fn explicit_deadline_takes_precedence_over_default_window(config: SlaConfig) {
    // The default window from creation would be overdue; the explicit
    // deadline is far out and wins.
    let created = t0() - Duration::days(30);
    let deadline = t0() + Duration::days(10);

    assert_eq!(
        evaluate_sla(Stage::Recorded, Some(created), Some(deadline), t0(), &config),
        SlaStatus::OnTrack
    );
}

#[rstest]
#[case(Duration::days(2), SlaStatus::OnTrack)]
#[case(Duration::hours(23), SlaStatus::DueSoon)]
#[case(Duration::hours(1), SlaStatus::DueSoon)]
#[case(Duration::zero(), SlaStatus::Overdue)]
#[case(Duration::hours(-1), SlaStatus::Overdue)]
fn explicit_deadline_classification(
    config: SlaConfig,
    #[case] until_deadline: Duration,
    #[case] expected: SlaStatus,
) {
    let status = evaluate_sla(
        Stage::Edited,
        Some(t0() - Duration::days(1)),
        Some(t0() + until_deadline),
        t0(),
        &config,
    );
    assert_eq!(status, expected);
}

#[rstest]
#[case(Duration::days(1), SlaStatus::OnTrack)]
#[case(Duration::days(6) + Duration::hours(23), SlaStatus::DueSoon)]
#[case(Duration::days(7), SlaStatus::Overdue)]
#[case(Duration::days(7) + Duration::hours(1), SlaStatus::Overdue)]
fn default_window_runs_from_creation(
    config: SlaConfig,
    #[case] age: Duration,
    #[case] expected: SlaStatus,
) {
    let created = t0() - age;
    let status = evaluate_sla(Stage::NotRecorded, Some(created), None, t0(), &config);
    assert_eq!(status, expected);
}

#[rstest]
fn deadline_boundary_is_inclusive(config: SlaConfig) {
    let status = evaluate_sla(Stage::Recorded, None, Some(t0()), t0(), &config);
    assert_eq!(status, SlaStatus::Overdue);
}

#[rstest]
fn no_inputs_means_no_due_date(config: SlaConfig) {
    let status = evaluate_sla(Stage::NeedsScript, None, None, t0(), &config);
    assert_eq!(status, SlaStatus::NoDueDate);
}

#[rstest]
fn custom_windows_are_honoured() {
    let tight = SlaConfig::new(2, 1);
    let created = t0() - Duration::hours(23);

    assert_eq!(
        evaluate_sla(Stage::Recorded, Some(created), None, t0(), &tight),
        SlaStatus::DueSoon
    );
    assert_eq!(
        evaluate_sla(
            Stage::Recorded,
            Some(t0() - Duration::hours(12)),
            None,
            t0(),
            &tight
        ),
        SlaStatus::OnTrack
    );
}
