//! Per-tab badge counts.

use serde::Serialize;

use super::pipeline::{partition, Partition};
use crate::models::lead::Lead;
use crate::scoring::categorizer::Category;
use crate::scoring::scorer::PriorityScorer;
use crate::Result;

/// Number of leads on each work-queue tab.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct TabCounts {
    /// Every lead.
    pub all: usize,
    /// Leads needing a first or fresh touch.
    pub action_required: usize,
    /// Leads we are waiting on.
    pub awaiting_response: usize,
    /// Leads with fresh customer activity.
    pub re_engaged: usize,
    /// Leads gone quiet.
    pub cold: usize,
}

impl TabCounts {
    /// Count leads per tab.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MalformedLead` if any lead violates a data-model
    /// invariant.
    pub fn tally<'a, I>(leads: I, scorer: &PriorityScorer) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Lead>,
    {
        Ok(Self::from_partition(&partition(leads, scorer)?))
    }

    /// Counts for an existing partition.
    #[must_use]
    pub fn from_partition(grouped: &Partition<'_>) -> Self {
        Self {
            all: grouped.len(),
            action_required: grouped.bucket(Category::ActionRequired).len(),
            awaiting_response: grouped.bucket(Category::AwaitingResponse).len(),
            re_engaged: grouped.bucket(Category::ReEngaged).len(),
            cold: grouped.bucket(Category::Cold).len(),
        }
    }

    /// Count for one tab.
    #[must_use]
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::All => self.all,
            Category::ActionRequired => self.action_required,
            Category::AwaitingResponse => self.awaiting_response,
            Category::ReEngaged => self.re_engaged,
            Category::Cold => self.cold,
        }
    }
}
