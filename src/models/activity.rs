//! Structured last-activity model and legacy free-text resolution.
//!
//! A lead's most recent activity is tracked as a direction (did we reach
//! out, or did the customer?) plus an optional timestamp. Recency buckets
//! are derived from the timestamp against an evaluation clock, so scoring
//! and categorization never inspect display text.
//!
//! Seed data written for the dashboard still carries phrases such as
//! `"Just now"` or `"2 hours ago - contact made"`. [`Activity::from_legacy`]
//! resolves those phrases into the structured form using the same
//! first-match order the ranking policy was written against.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Phrases that mark an outbound touch by the sales team.
const CONTACT_PHRASES: [&str; 3] = ["Just replied", "contact sent", "contact made"];

/// Elapsed-time phrases that age an activity out of the working queue.
const WEEK_PHRASES: [&str; 2] = ["week ago", "weeks ago"];
const MONTH_PHRASES: [&str; 2] = ["month ago", "months ago"];

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;
const DAYS_PER_WEEK: i64 = 7;
const DAYS_PER_MONTH: i64 = 30;

/// Who produced the most recent activity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityDirection {
    /// The customer acted (inquiry, visit, reply, page view).
    Inbound,
    /// The sales team contacted the customer and is awaiting a response.
    Outbound,
}

/// Coarse age bucket of an activity relative to an evaluation clock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Recency {
    /// Less than one minute old.
    JustNow,
    /// Less than one hour old.
    Minutes,
    /// Less than one day old.
    Hours,
    /// Less than one week old.
    Days,
    /// A week or older.
    Stale,
    /// No timestamp recorded.
    Unknown,
}

/// Most recent activity recorded against a lead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Who acted.
    pub direction: ActivityDirection,
    /// Display text shown on the lead card.
    pub summary: String,
    /// When it happened, if known.
    pub at: Option<DateTime<Utc>>,
}

impl Activity {
    /// Customer-side activity at `at`.
    #[must_use]
    pub fn inbound(summary: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            direction: ActivityDirection::Inbound,
            summary: summary.into(),
            at: Some(at),
        }
    }

    /// Outbound contact by the sales team at `at`.
    #[must_use]
    pub fn outbound(summary: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            direction: ActivityDirection::Outbound,
            summary: summary.into(),
            at: Some(at),
        }
    }

    /// Whether the team is waiting on the customer.
    #[must_use]
    pub fn is_outbound(&self) -> bool {
        self.direction == ActivityDirection::Outbound
    }

    /// Age bucket of this activity as seen from `now`.
    ///
    /// Timestamps in the future (clock skew) count as [`Recency::JustNow`].
    #[must_use]
    pub fn recency(&self, now: DateTime<Utc>) -> Recency {
        let Some(at) = self.at else {
            return Recency::Unknown;
        };
        let age = (now - at).num_seconds();
        if age < SECS_PER_MINUTE {
            Recency::JustNow
        } else if age < SECS_PER_HOUR {
            Recency::Minutes
        } else if age < SECS_PER_DAY {
            Recency::Hours
        } else if age < DAYS_PER_WEEK * SECS_PER_DAY {
            Recency::Days
        } else {
            Recency::Stale
        }
    }

    /// Resolve a free-text activity description against `now`.
    ///
    /// First match wins: contact phrases, `"Just now"`, `"week(s) ago"` or
    /// `"month(s) ago"`, then `"min"`, `"hour"` and `"day"`. The leading
    /// number in the text sets the age and is clamped into the bucket the
    /// matched unit names. Text matching none of these keeps an unknown
    /// timestamp, so "weekend" or "this month" alone never ages a lead out.
    #[must_use]
    pub fn from_legacy(text: &str, now: DateTime<Utc>) -> Self {
        let summary = text.to_owned();
        if CONTACT_PHRASES.iter().any(|phrase| text.contains(phrase)) {
            return Self::outbound(summary, now);
        }
        if text.contains("Just now") {
            return Self::inbound(summary, now);
        }

        let count = leading_count(text);
        let contains_any = |phrases: &[&str]| phrases.iter().any(|p| text.contains(p));
        // An explicit "N weeks/months ago" outranks a weekday name or other
        // unit words elsewhere in the text.
        let age = if contains_any(&WEEK_PHRASES) {
            Some(Duration::days(count.max(1) * DAYS_PER_WEEK))
        } else if contains_any(&MONTH_PHRASES) {
            Some(Duration::days(count.max(1) * DAYS_PER_MONTH))
        } else if text.contains("min") {
            Some(Duration::minutes(count.clamp(1, 59)))
        } else if text.contains("hour") {
            Some(Duration::hours(count.clamp(1, 23)))
        } else if text.contains("day") {
            Some(Duration::days(count.clamp(1, DAYS_PER_WEEK - 1)))
        } else {
            None
        };

        Self {
            direction: ActivityDirection::Inbound,
            summary,
            at: age.map(|age| now - age),
        }
    }
}

/// First run of ASCII digits in `text`, or 1 when there is none.
fn leading_count(text: &str) -> i64 {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(1)
}
