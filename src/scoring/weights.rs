//! Tunable weights for the lead urgency score.

use serde::{Deserialize, Serialize};

use crate::models::activity::Recency;
use crate::models::lead::{LeadStatus, Priority};
use crate::{AppError, Result};

/// Additive score weights, loaded from the `[scoring]` config table.
///
/// Every field is optional in TOML; omitted fields keep the defaults the
/// sales floor has been ranking with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct ScoringWeights {
    /// Base for `hot` leads.
    pub hot: i64,
    /// Base for `warm` leads.
    pub warm: i64,
    /// Base for `cold` leads.
    pub cold: i64,
    /// Points per 1000 currency units of deal value.
    pub value_points_per_thousand: i64,
    /// Bonus while the customer is on the lot.
    pub on_lot_bonus: i64,
    /// Adjustment when we are waiting on the customer. Negative.
    pub recent_contact_penalty: i64,
    /// Customer activity under a minute old.
    pub just_now_bonus: i64,
    /// Customer activity under an hour old.
    pub minutes_bonus: i64,
    /// Customer activity under a day old.
    pub hours_bonus: i64,
    /// Customer activity under a week old.
    pub days_bonus: i64,
    /// Bonus for untouched leads.
    pub new_status_bonus: i64,
    /// Bonus for contacted leads.
    pub contacted_status_bonus: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            hot: 100,
            warm: 50,
            cold: 10,
            value_points_per_thousand: 2,
            on_lot_bonus: 50,
            recent_contact_penalty: -75,
            just_now_bonus: 40,
            minutes_bonus: 30,
            hours_bonus: 20,
            days_bonus: 25,
            new_status_bonus: 25,
            contacted_status_bonus: 5,
        }
    }
}

impl ScoringWeights {
    /// Reject weight sets that would invert the ranking policy.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the contact adjustment is positive or
    /// the value weight is negative.
    pub fn validate(&self) -> Result<()> {
        if self.recent_contact_penalty > 0 {
            return Err(AppError::Config(
                "scoring.recent_contact_penalty must not be positive".into(),
            ));
        }
        if self.value_points_per_thousand < 0 {
            return Err(AppError::Config(
                "scoring.value_points_per_thousand must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Base points for a priority tier.
    #[must_use]
    pub fn tier(&self, priority: Priority) -> i64 {
        match priority {
            Priority::Hot => self.hot,
            Priority::Warm => self.warm,
            Priority::Cold => self.cold,
        }
    }

    /// Points for customer-side activity of the given age.
    #[must_use]
    pub fn recency(&self, recency: Recency) -> i64 {
        match recency {
            Recency::JustNow => self.just_now_bonus,
            Recency::Minutes => self.minutes_bonus,
            Recency::Hours => self.hours_bonus,
            Recency::Days => self.days_bonus,
            Recency::Stale | Recency::Unknown => 0,
        }
    }

    /// Points for a pipeline status.
    #[must_use]
    pub fn status(&self, status: LeadStatus) -> i64 {
        match status {
            LeadStatus::New => self.new_status_bonus,
            LeadStatus::Contacted => self.contacted_status_bonus,
            LeadStatus::Qualified | LeadStatus::Closed => 0,
        }
    }
}
