use lead_desk::journey::machine::{advance, advance_named, next_task, StageView};
use lead_desk::models::journey::JourneyStage;
use lead_desk::AppError;

#[test]
fn advance_returns_the_unique_successor() {
    let expected = [
        (JourneyStage::Engaged, JourneyStage::Visit),
        (JourneyStage::Visit, JourneyStage::Proposal),
        (JourneyStage::Proposal, JourneyStage::Sold),
        (JourneyStage::Sold, JourneyStage::Delivered),
    ];
    for (from, to) in expected {
        assert_eq!(advance(from), to);
        assert!(to > from);
    }
}

#[test]
fn delivered_is_terminal_and_idempotent() {
    assert_eq!(advance(JourneyStage::Delivered), JourneyStage::Delivered);
    assert_eq!(
        advance(advance(JourneyStage::Delivered)),
        JourneyStage::Delivered
    );
}

#[test]
fn proposal_reply_advances_to_sold() {
    assert_eq!(advance_named("proposal").unwrap(), JourneyStage::Sold);
}

#[test]
fn delivered_reply_leaves_stage_unchanged() {
    assert_eq!(advance_named("delivered").unwrap(), JourneyStage::Delivered);
}

#[test]
fn unknown_stage_name_is_invalid_state() {
    for raw in ["negotiation", "", "Proposal"] {
        let err = advance_named(raw).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)), "{raw}");
    }
}

#[test]
fn stage_view_splits_completed_and_pending() {
    let view = StageView::for_stage(JourneyStage::Proposal);
    assert_eq!(view.current, JourneyStage::Proposal);
    assert_eq!(
        view.completed,
        [JourneyStage::Engaged, JourneyStage::Visit]
    );
    assert_eq!(
        view.pending,
        [JourneyStage::Sold, JourneyStage::Delivered]
    );
    assert_eq!(view.progress_percent, 60);
    assert!(view.next_task.is_some());
}

#[test]
fn delivered_view_has_no_next_task() {
    let view = StageView::for_stage(JourneyStage::Delivered);
    assert!(view.pending.is_empty());
    assert_eq!(view.completed.len(), 4);
    assert_eq!(view.next_task, None);
    assert_eq!(next_task(JourneyStage::Delivered), None);
}

#[test]
fn stage_view_serializes_camel_case() {
    let value = serde_json::to_value(StageView::for_stage(JourneyStage::Visit)).unwrap();
    assert_eq!(value["current"], "visit");
    assert_eq!(value["progressPercent"], 40);
    assert_eq!(value["nextTask"], "Prepare a purchase proposal");
}
