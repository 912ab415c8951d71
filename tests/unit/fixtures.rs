//! Shared lead builders for unit tests.

use chrono::{DateTime, TimeZone, Utc};
use lead_desk::models::activity::Activity;
use lead_desk::models::journey::JourneyStage;
use lead_desk::models::lead::{Lead, LeadProfile, LeadStatus, Priority};

/// Fixed evaluation clock.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

/// A warm, new lead with an activity phrase resolved against [`now`].
pub fn lead(id: &str, activity: &str) -> Lead {
    Lead {
        id: id.to_owned(),
        name: format!("Customer {id}"),
        email: format!("{id}@example.com"),
        phone: None,
        vehicle: "2024 Honda Civic".to_owned(),
        priority: Priority::Warm,
        status: LeadStatus::New,
        value: 25_000,
        budget: None,
        last_activity: Activity::from_legacy(activity, now()),
        contact_attempts: None,
        response_rate: None,
        days_since_last_contact: None,
        time_on_lot: None,
        journey_stage: JourneyStage::Engaged,
        stage_progress: 20,
        profile: LeadProfile::default(),
    }
}

/// Same as [`lead`] with tier and status overridden.
pub fn lead_with(id: &str, activity: &str, priority: Priority, status: LeadStatus) -> Lead {
    Lead {
        priority,
        status,
        ..lead(id, activity)
    }
}
