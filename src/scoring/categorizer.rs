//! Work-queue categorization.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::models::activity::Recency;
use crate::models::lead::{Lead, LeadStatus, Priority};
use crate::Result;

/// Work-queue tab. Every lead lands in exactly one of the four buckets;
/// [`Category::All`] is a view over all of them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Every lead.
    All,
    /// Nothing attempted yet, or an ambiguous signal.
    ActionRequired,
    /// We reached out and are waiting.
    AwaitingResponse,
    /// Customer showed fresh interest.
    ReEngaged,
    /// Old activity or cold tier.
    Cold,
}

impl Category {
    /// The mutually exclusive buckets, in tab order.
    pub const BUCKETS: [Self; 4] = [
        Self::ActionRequired,
        Self::AwaitingResponse,
        Self::ReEngaged,
        Self::Cold,
    ];

    /// Tab identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ActionRequired => "action-required",
            Self::AwaitingResponse => "awaiting-response",
            Self::ReEngaged => "re-engaged",
            Self::Cold => "cold",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assign a lead to its work-queue bucket as seen from `now`.
///
/// First matching rule wins:
/// 1. old activity or cold tier, with no fresh customer activity → `Cold`
/// 2. customer activity under a minute old → `ReEngaged`
/// 3. outbound contact pending, or status `contacted` → `AwaitingResponse`
/// 4. otherwise → `ActionRequired`
///
/// Outbound contact outranks fresh customer activity when both describe
/// the same latest event.
///
/// # Errors
///
/// Returns `AppError::MalformedLead` if the lead violates a data-model
/// invariant.
pub fn categorize(lead: &Lead, now: DateTime<Utc>) -> Result<Category> {
    lead.validate()?;

    let recency = lead.last_activity.recency(now);
    let has_recent_contact = lead.last_activity.is_outbound();
    let has_recent_customer_activity = !has_recent_contact && recency == Recency::JustNow;
    let is_old_activity = recency == Recency::Stale || lead.priority == Priority::Cold;

    let category = if is_old_activity && !has_recent_customer_activity {
        Category::Cold
    } else if has_recent_customer_activity {
        Category::ReEngaged
    } else if has_recent_contact || lead.status == LeadStatus::Contacted {
        Category::AwaitingResponse
    } else {
        Category::ActionRequired
    };
    Ok(category)
}
