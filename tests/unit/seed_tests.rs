use std::io::Write;

use lead_desk::models::activity::{ActivityDirection, Recency};
use lead_desk::models::journey::JourneyStage;
use lead_desk::models::lead::{LeadStatus, Priority};
use lead_desk::models::message::Channel;
use lead_desk::store::seed::{load_seed_file, parse_seed};
use lead_desk::AppError;

use super::fixtures::now;

const SEED: &str = r#"[
  {
    "id": "1",
    "name": "Sarah Johnson",
    "email": "sarah.j@email.com",
    "phone": "(555) 123-4567",
    "vehicle": "2024 BMW X5",
    "priority": "hot",
    "status": "new",
    "value": 68000,
    "budget": { "min": 60000, "max": 75000 },
    "lastActivity": "Just now",
    "timeOnLot": "15 min",
    "journeyStage": "visit",
    "stageProgress": 40,
    "dealProbability": 85,
    "sentiment": "positive",
    "keyInsight": "Ready to buy today",
    "preferredContact": "call"
  },
  {
    "id": "2",
    "name": "Mike Chen",
    "email": "mike.chen@email.com",
    "vehicle": "2024 Tesla Model 3",
    "priority": "warm",
    "status": "contacted",
    "value": 42000,
    "lastActivity": "2 hours ago - contact made",
    "contactAttempts": 2,
    "responseRate": 50,
    "journeyStage": "engaged"
  }
]"#;

#[test]
fn seed_resolves_phrases_and_profile() {
    let leads = parse_seed(SEED, now()).unwrap();
    assert_eq!(leads.len(), 2);

    let sarah = &leads[0];
    assert_eq!(sarah.priority, Priority::Hot);
    assert_eq!(sarah.journey_stage, JourneyStage::Visit);
    assert_eq!(sarah.last_activity.recency(now()), Recency::JustNow);
    assert_eq!(sarah.last_activity.summary, "Just now");
    assert!(sarah.is_on_lot());
    assert_eq!(sarah.profile.deal_probability, Some(85));
    assert_eq!(sarah.profile.preferred_contact, Some(Channel::Call));

    let mike = &leads[1];
    assert_eq!(mike.status, LeadStatus::Contacted);
    assert_eq!(mike.last_activity.direction, ActivityDirection::Outbound);
    assert_eq!(mike.stage_progress, 0);
    assert!(!mike.is_on_lot());
}

#[test]
fn unknown_stage_is_invalid_state() {
    let raw = SEED.replace("\"visit\"", "\"test_drive\"");
    assert!(matches!(
        parse_seed(&raw, now()),
        Err(AppError::InvalidState(_))
    ));
}

#[test]
fn invariant_violation_is_malformed_lead() {
    let raw = SEED.replace("68000", "-68000");
    assert!(matches!(
        parse_seed(&raw, now()),
        Err(AppError::MalformedLead(_))
    ));
}

#[test]
fn unknown_priority_is_serialization_error() {
    let raw = SEED.replace("\"hot\"", "\"scorching\"");
    assert!(matches!(
        parse_seed(&raw, now()),
        Err(AppError::Serialization(_))
    ));
}

#[test]
fn load_seed_file_reads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SEED.as_bytes()).unwrap();
    let leads = load_seed_file(file.path(), now()).unwrap();
    assert_eq!(leads.len(), 2);
}

#[test]
fn missing_seed_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_seed_file(dir.path().join("absent.json"), now()).unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
}

#[test]
fn bundled_demo_seed_loads() {
    let leads = parse_seed(include_str!("../../demos/leads.json"), now()).unwrap();
    assert_eq!(leads.len(), 5);
}
