use lead_desk::models::activity::ActivityDirection;
use lead_desk::models::journey::JourneyStage;
use lead_desk::models::lead::{Lead, LeadStatus};
use lead_desk::models::message::Channel;
use lead_desk::store::lead_store::{LeadStore, ReplyOutcome};
use lead_desk::AppError;

use super::fixtures::{lead, now};

fn store_with(leads: Vec<Lead>) -> LeadStore {
    LeadStore::from_leads(leads).unwrap()
}

#[test]
fn leads_iterate_in_insertion_order() {
    let store = store_with(vec![lead("c", "Just now"), lead("a", "Just now"), lead("b", "Just now")]);
    let ids: Vec<&str> = store.leads().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["c", "a", "b"]);
    assert_eq!(store.len(), 3);
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = LeadStore::from_leads(vec![lead("a", "Just now"), lead("a", "3 hours ago")])
        .unwrap_err();
    assert!(matches!(err, AppError::MalformedLead(_)));
}

#[test]
fn insert_replaces_in_place_and_validates() {
    let mut store = store_with(vec![lead("a", "Just now"), lead("b", "Just now")]);
    let updated = Lead {
        value: 99_000,
        ..lead("a", "Just now")
    };
    store.insert(updated).unwrap();
    let ids: Vec<&str> = store.leads().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
    assert_eq!(store.get("a").unwrap().value, 99_000);

    let bad = Lead {
        response_rate: Some(120),
        ..lead("c", "Just now")
    };
    assert!(matches!(store.insert(bad), Err(AppError::MalformedLead(_))));
    assert!(store.get("c").is_none());
}

#[test]
fn record_contact_marks_lead_contacted() {
    let mut store = store_with(vec![lead("a", "3 hours ago")]);
    let captured = store.record_contact("a", Channel::Email, now()).unwrap();
    assert_eq!(captured, JourneyStage::Engaged);

    let lead = store.get("a").unwrap();
    assert_eq!(lead.status, LeadStatus::Contacted);
    assert_eq!(lead.last_activity.direction, ActivityDirection::Outbound);
    assert_eq!(lead.last_activity.summary, "email contact sent");
    assert_eq!(lead.contact_attempts, Some(1));
    assert_eq!(lead.days_since_last_contact, Some(0));
    assert_eq!(lead.stage_progress, 35);
}

#[test]
fn record_contact_caps_advisory_progress() {
    let mut store = store_with(vec![Lead {
        stage_progress: 95,
        ..lead("a", "Just now")
    }]);
    store.record_contact("a", Channel::Call, now()).unwrap();
    assert_eq!(store.get("a").unwrap().stage_progress, 100);
}

#[test]
fn record_contact_on_missing_lead_is_not_found() {
    let mut store = LeadStore::new();
    let err = store.record_contact("ghost", Channel::Text, now()).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn reply_at_proposal_advances_to_sold_and_qualifies() {
    let mut store = store_with(vec![Lead {
        journey_stage: JourneyStage::Proposal,
        status: LeadStatus::Contacted,
        ..lead("a", "contact sent")
    }]);
    let outcome = store.apply_reply("a", JourneyStage::Proposal, "Customer replied via text", now());
    assert_eq!(
        outcome,
        ReplyOutcome::Advanced {
            from: JourneyStage::Proposal,
            to: JourneyStage::Sold,
        }
    );
    let lead = store.get("a").unwrap();
    assert_eq!(lead.journey_stage, JourneyStage::Sold);
    assert_eq!(lead.status, LeadStatus::Qualified);
    assert_eq!(lead.last_activity.direction, ActivityDirection::Inbound);
}

#[test]
fn reply_at_delivered_keeps_stage() {
    let mut store = store_with(vec![Lead {
        journey_stage: JourneyStage::Delivered,
        ..lead("a", "contact sent")
    }]);
    let outcome = store.apply_reply("a", JourneyStage::Delivered, "thanks", now());
    assert_eq!(
        outcome,
        ReplyOutcome::Advanced {
            from: JourneyStage::Delivered,
            to: JourneyStage::Delivered,
        }
    );
    assert_eq!(store.get("a").unwrap().journey_stage, JourneyStage::Delivered);
}

#[test]
fn reply_captured_at_an_earlier_stage_is_stale() {
    let mut store = store_with(vec![Lead {
        journey_stage: JourneyStage::Visit,
        status: LeadStatus::Contacted,
        ..lead("a", "contact sent")
    }]);
    let before = store.get("a").cloned().unwrap();
    let outcome = store.apply_reply("a", JourneyStage::Engaged, "late reply", now());
    assert_eq!(
        outcome,
        ReplyOutcome::Stale {
            captured: JourneyStage::Engaged,
            current: JourneyStage::Visit,
        }
    );
    assert_eq!(store.get("a").unwrap(), &before);
}

#[test]
fn reply_for_removed_lead_is_orphaned() {
    let mut store = store_with(vec![lead("a", "contact sent")]);
    assert!(store.remove("a").is_some());
    assert!(store.is_empty());
    assert_eq!(
        store.apply_reply("a", JourneyStage::Engaged, "hello?", now()),
        ReplyOutcome::Orphaned
    );
    assert!(store.remove("a").is_none());
}
