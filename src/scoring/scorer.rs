//! Lead urgency score.
//!
//! The score is a weighted sum of the priority tier, deal value, on-lot
//! presence, activity recency and pipeline status. Leads the team has
//! already contacted are pushed down so nobody calls a customer twice
//! while they are still deciding; fresh inbound engagement pushes a lead up.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::categorizer::{categorize, Category};
use super::weights::ScoringWeights;
use crate::models::lead::Lead;
use crate::Result;

/// Scores and categorizes leads against a fixed evaluation clock.
///
/// Holding `now` fixed for the lifetime of a scorer keeps every lead in
/// one render pass on the same recency boundaries.
#[derive(Debug, Clone, Copy)]
pub struct PriorityScorer {
    weights: ScoringWeights,
    now: DateTime<Utc>,
}

impl PriorityScorer {
    /// Construct a scorer with the given weights and evaluation clock.
    #[must_use]
    pub fn new(weights: ScoringWeights, now: DateTime<Utc>) -> Self {
        Self { weights, now }
    }

    /// Weights in effect.
    #[must_use]
    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Evaluation clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Urgency score for a single lead. Higher ranks first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MalformedLead` if the lead violates a data-model
    /// invariant.
    pub fn score(&self, lead: &Lead) -> Result<i64> {
        lead.validate()?;
        Ok(self.score_valid(lead))
    }

    /// Work-queue category for a single lead under this scorer's clock.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MalformedLead` if the lead violates a data-model
    /// invariant.
    pub fn category(&self, lead: &Lead) -> Result<Category> {
        categorize(lead, self.now)
    }

    pub(crate) fn score_valid(&self, lead: &Lead) -> i64 {
        let w = &self.weights;

        let tier = w.tier(lead.priority);
        let value = lead.value.saturating_mul(w.value_points_per_thousand) / 1000;
        let presence = if lead.is_on_lot() { w.on_lot_bonus } else { 0 };
        let activity = if lead.last_activity.is_outbound() {
            w.recent_contact_penalty
        } else {
            w.recency(lead.last_activity.recency(self.now))
        };
        let status = w.status(lead.status);

        let total = [value, presence, activity, status]
            .into_iter()
            .fold(tier, i64::saturating_add);
        debug!(
            lead_id = %lead.id,
            tier,
            value,
            presence,
            activity,
            status,
            total,
            "scored lead"
        );
        total
    }
}
