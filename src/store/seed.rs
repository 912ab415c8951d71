//! JSON seed format for the dashboard's lead collection.
//!
//! Seed files describe recency with dashboard phrases (`"Just now"`,
//! `"3 hours ago"`, `"contact sent"`) rather than timestamps. Loading
//! resolves each phrase against a caller-supplied clock.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::activity::Activity;
use crate::models::lead::{Budget, Lead, LeadProfile, LeadStatus, Priority};
use crate::{AppError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedLead {
    id: String,
    name: String,
    email: String,
    #[serde(default)]
    phone: Option<String>,
    vehicle: String,
    priority: Priority,
    status: LeadStatus,
    value: i64,
    #[serde(default)]
    budget: Option<Budget>,
    last_activity: String,
    #[serde(default)]
    contact_attempts: Option<u32>,
    #[serde(default)]
    response_rate: Option<u8>,
    #[serde(default)]
    days_since_last_contact: Option<u32>,
    #[serde(default)]
    time_on_lot: Option<String>,
    journey_stage: String,
    #[serde(default)]
    stage_progress: u8,
    #[serde(flatten)]
    profile: LeadProfile,
}

impl SeedLead {
    fn into_lead(self, now: DateTime<Utc>) -> Result<Lead> {
        let lead = Lead {
            journey_stage: self.journey_stage.parse()?,
            last_activity: Activity::from_legacy(&self.last_activity, now),
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            vehicle: self.vehicle,
            priority: self.priority,
            status: self.status,
            value: self.value,
            budget: self.budget,
            contact_attempts: self.contact_attempts,
            response_rate: self.response_rate,
            days_since_last_contact: self.days_since_last_contact,
            time_on_lot: self.time_on_lot,
            stage_progress: self.stage_progress,
            profile: self.profile,
        };
        lead.validate()?;
        Ok(lead)
    }
}

/// Parse a JSON array of seed leads, in file order.
///
/// # Errors
///
/// Returns `AppError::Serialization` for malformed JSON,
/// `AppError::InvalidState` for an unknown journey stage, or
/// `AppError::MalformedLead` for an invariant violation.
pub fn parse_seed(raw: &str, now: DateTime<Utc>) -> Result<Vec<Lead>> {
    let seeds: Vec<SeedLead> = serde_json::from_str(raw)?;
    seeds.into_iter().map(|seed| seed.into_lead(now)).collect()
}

/// Read and parse a seed file.
///
/// # Errors
///
/// Returns `AppError::Io` if the file cannot be read, otherwise the
/// errors of [`parse_seed`].
pub fn load_seed_file(path: impl AsRef<Path>, now: DateTime<Utc>) -> Result<Vec<Lead>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|err| AppError::Io(format!("failed to read seed {}: {err}", path.display())))?;
    parse_seed(&raw, now)
}
