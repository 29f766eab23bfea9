//! Unit tests for the production stage transition graph.

use crate::workitem::domain::Stage;
use rstest::rstest;

const ALL_STAGES: [Stage; 11] = [
    Stage::NeedsScript,
    Stage::GeneratingScript,
    Stage::NotRecorded,
    Stage::AiRendering,
    Stage::ReadyForReview,
    Stage::Recorded,
    Stage::Edited,
    Stage::ApprovedNeedsEdits,
    Stage::ReadyToPost,
    Stage::Posted,
    Stage::Rejected,
];

#[rstest]
#[case(Stage::NeedsScript, Stage::GeneratingScript, true)]
#[case(Stage::NeedsScript, Stage::NotRecorded, true)]
#[case(Stage::NeedsScript, Stage::Posted, true)]
#[case(Stage::GeneratingScript, Stage::NeedsScript, false)]
#[case(Stage::GeneratingScript, Stage::NotRecorded, true)]
#[case(Stage::NotRecorded, Stage::AiRendering, true)]
#[case(Stage::NotRecorded, Stage::Recorded, true)]
#[case(Stage::AiRendering, Stage::ReadyForReview, true)]
#[case(Stage::AiRendering, Stage::NotRecorded, false)]
#[case(Stage::ReadyForReview, Stage::Recorded, true)]
#[case(Stage::Recorded, Stage::Edited, true)]
#[case(Stage::Recorded, Stage::NeedsScript, false)]
#[case(Stage::Edited, Stage::ApprovedNeedsEdits, true)]
#[case(Stage::Edited, Stage::ReadyToPost, true)]
#[case(Stage::ApprovedNeedsEdits, Stage::ReadyToPost, true)]
#[case(Stage::ApprovedNeedsEdits, Stage::Edited, false)]
#[case(Stage::ReadyToPost, Stage::Posted, true)]
#[case(Stage::ReadyToPost, Stage::Edited, false)]
#[case(Stage::Posted, Stage::ReadyToPost, false)]
#[case(Stage::Posted, Stage::NeedsScript, false)]
#[case(Stage::Rejected, Stage::NotRecorded, true)]
#[case(Stage::Rejected, Stage::NeedsScript, false)]
#[case(Stage::Rejected, Stage::Posted, false)]
fn can_transition_to_returns_expected(
    #[case] from: Stage,
    #[case] to: Stage,
    #[case] expected: bool,
) {
    assert_eq!(from.can_transition_to(to), expected);
}

#[rstest]
#[case(Stage::NeedsScript, false)]
#[case(Stage::GeneratingScript, false)]
#[case(Stage::NotRecorded, false)]
#[case(Stage::AiRendering, false)]
#[case(Stage::ReadyForReview, false)]
#[case(Stage::Recorded, false)]
#[case(Stage::Edited, false)]
#[case(Stage::ApprovedNeedsEdits, false)]
#[case(Stage::ReadyToPost, false)]
#[case(Stage::Posted, true)]
#[case(Stage::Rejected, true)]
fn is_terminal_returns_expected(#[case] stage: Stage, #[case] expected: bool) {
    assert_eq!(stage.is_terminal(), expected);
}

#[rstest]
fn happy_path_moves_are_forward_only() {
    for from in ALL_STAGES {
        for to in ALL_STAGES {
            let (Some(from_pos), Some(to_pos)) =
                (from.happy_path_position(), to.happy_path_position())
            else {
                continue;
            };
            if to_pos <= from_pos {
                assert!(
                    !from.can_transition_to(to),
                    "backward or self move {from} -> {to} must be refused"
                );
            }
        }
    }
}

#[rstest]
fn posted_is_a_dead_end() {
    for to in ALL_STAGES {
        assert!(!Stage::Posted.can_transition_to(to));
    }
}

#[rstest]
fn every_non_terminal_stage_can_reject() {
    for from in ALL_STAGES {
        assert_eq!(from.can_transition_to(Stage::Rejected), !from.is_terminal());
    }
}

#[rstest]
fn rejected_restarts_only_into_not_recorded() {
    for to in ALL_STAGES {
        assert_eq!(
            Stage::Rejected.can_transition_to(to),
            to == Stage::NotRecorded
        );
    }
}

#[rstest]
fn stage_round_trips_through_storage_form() {
    for stage in ALL_STAGES {
        let parsed = Stage::try_from(stage.as_str()).expect("canonical form must parse");
        assert_eq!(parsed, stage);
    }
}

#[rstest]
fn stage_parsing_rejects_unknown_values() {
    assert!(Stage::try_from("in_review").is_err());
    assert!(Stage::try_from("").is_err());
}
