//! Lead model and invariant validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::activity::Activity;
use super::journey::JourneyStage;
use super::message::Channel;
use crate::{AppError, Result};

/// Advisory progress assigned to a freshly created lead.
const INQUIRY_STAGE_PROGRESS: u8 = 10;

/// Coarse urgency tier assigned by the sales team.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Ready to buy.
    Hot,
    /// Interested, not urgent.
    Warm,
    /// Low engagement.
    Cold,
}

impl Priority {
    /// Parse a tier name, returning `None` for anything else.
    #[must_use]
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw {
            "hot" => Some(Self::Hot),
            "warm" => Some(Self::Warm),
            "cold" => Some(Self::Cold),
            _ => None,
        }
    }
}

/// Sales-pipeline status of a lead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    /// No contact attempted yet.
    New,
    /// Reached out, awaiting response.
    Contacted,
    /// Customer responded and is progressing.
    Qualified,
    /// Won or lost.
    Closed,
}

impl LeadStatus {
    /// Fixed ordering used by the status sort.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::New => 0,
            Self::Contacted => 1,
            Self::Qualified => 2,
            Self::Closed => 3,
        }
    }

    /// Parse a status name, returning `None` for anything else.
    #[must_use]
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw {
            "new" => Some(Self::New),
            "contacted" => Some(Self::Contacted),
            "qualified" => Some(Self::Qualified),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// Customer price range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Budget {
    /// Lower bound.
    pub min: i64,
    /// Upper bound.
    pub max: i64,
}

/// Customer sentiment read from recent conversations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    /// Enthusiastic.
    Positive,
    /// No clear signal.
    Neutral,
    /// Hesitant or frustrated.
    Negative,
}

/// Read-only display attributes. Never consulted by ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeadProfile {
    /// Estimated close probability, 0–100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_probability: Option<u8>,
    /// Conversation tone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    /// One-line coaching note for the salesperson.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_insight: Option<String>,
    /// Vehicle offered in trade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_in_vehicle: Option<String>,
    /// Channel the customer prefers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_contact: Option<Channel>,
}

/// A prospective customer and their sales-pipeline state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    /// Opaque unique identifier.
    pub id: String,
    /// Customer name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Vehicle of interest.
    pub vehicle: String,
    /// Urgency tier.
    pub priority: Priority,
    /// Pipeline status.
    pub status: LeadStatus,
    /// Deal value in whole currency units.
    pub value: i64,
    /// Optional price range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
    /// Most recent activity.
    pub last_activity: Activity,
    /// Number of outbound contact attempts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_attempts: Option<u32>,
    /// Share of attempts the customer answered, 0–100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_rate: Option<u8>,
    /// Days since the team last reached out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_since_last_contact: Option<u32>,
    /// Present when the customer is physically on the lot; holds how long.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_on_lot: Option<String>,
    /// Current journey stage.
    pub journey_stage: JourneyStage,
    /// Advisory, caller-set progress percentage (0–100).
    ///
    /// Decoupled from `journey_stage`; see
    /// [`StageView::progress_percent`](crate::journey::machine::StageView::progress_percent)
    /// for the stage-derived figure.
    pub stage_progress: u8,
    /// Display-only attributes.
    #[serde(flatten)]
    pub profile: LeadProfile,
}

impl Lead {
    /// Create a lead from a fresh inbound inquiry.
    #[must_use]
    pub fn new_inquiry(
        name: String,
        email: String,
        vehicle: String,
        value: i64,
        now: DateTime<Utc>,
    ) -> Self {
        let summary = format!("New inquiry about {vehicle}");
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            phone: None,
            vehicle,
            priority: Priority::Warm,
            status: LeadStatus::New,
            value,
            budget: None,
            last_activity: Activity::inbound(summary, now),
            contact_attempts: Some(0),
            response_rate: None,
            days_since_last_contact: None,
            time_on_lot: None,
            journey_stage: JourneyStage::Engaged,
            stage_progress: INQUIRY_STAGE_PROGRESS,
            profile: LeadProfile::default(),
        }
    }

    /// Whether the customer is physically at the dealership right now.
    #[must_use]
    pub fn is_on_lot(&self) -> bool {
        self.time_on_lot
            .as_deref()
            .is_some_and(|dwell| !dwell.trim().is_empty())
    }

    /// Check data-model invariants.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MalformedLead` naming the first violated
    /// invariant: empty id, negative value, inverted or negative budget,
    /// or a percentage above 100.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::MalformedLead("lead id must not be empty".into()));
        }
        if self.value < 0 {
            return Err(AppError::MalformedLead(format!(
                "lead {} has negative value {}",
                self.id, self.value
            )));
        }
        if let Some(budget) = self.budget {
            if budget.min < 0 || budget.min > budget.max {
                return Err(AppError::MalformedLead(format!(
                    "lead {} has invalid budget {}..{}",
                    self.id, budget.min, budget.max
                )));
            }
        }
        if self.response_rate.is_some_and(|rate| rate > 100) {
            return Err(AppError::MalformedLead(format!(
                "lead {} response rate exceeds 100",
                self.id
            )));
        }
        if self.stage_progress > 100 {
            return Err(AppError::MalformedLead(format!(
                "lead {} stage progress exceeds 100",
                self.id
            )));
        }
        if self.profile.deal_probability.is_some_and(|p| p > 100) {
            return Err(AppError::MalformedLead(format!(
                "lead {} deal probability exceeds 100",
                self.id
            )));
        }
        Ok(())
    }
}
