//! Filter, sort and group leads for one work-queue tab.
//!
//! A run is strictly ordered: partition every lead into its bucket, pick
//! the active tab, apply the search term, apply the priority/status filter,
//! then sort. Input leads are only borrowed, so repeated runs over an
//! unchanged set yield identical output.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::convert::Infallible;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::models::lead::{Lead, LeadStatus, Priority};
use crate::scoring::categorizer::Category;
use crate::scoring::scorer::PriorityScorer;
use crate::Result;

/// Ordering applied to the filtered tab.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Descending urgency score.
    #[default]
    Priority,
    /// Descending deal value.
    Value,
    /// Ascending by the activity text as displayed. A plain string order,
    /// not a chronological one.
    Activity,
    /// Pipeline order: new, contacted, qualified, closed.
    Status,
}

/// Priority or status filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LeadFilter {
    /// Pass everything.
    #[default]
    All,
    /// Match the priority tier.
    Priority(Priority),
    /// Match the pipeline status.
    Status(LeadStatus),
    /// Unrecognised filter value; matches nothing.
    Unknown(String),
}

impl LeadFilter {
    /// Whether `lead` passes this filter.
    #[must_use]
    pub fn matches(&self, lead: &Lead) -> bool {
        match self {
            Self::All => true,
            Self::Priority(priority) => lead.priority == *priority,
            Self::Status(status) => lead.status == *status,
            Self::Unknown(_) => false,
        }
    }
}

impl FromStr for LeadFilter {
    type Err = Infallible;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        if raw == "all" {
            return Ok(Self::All);
        }
        if let Some(priority) = Priority::from_name(raw) {
            return Ok(Self::Priority(priority));
        }
        Ok(LeadStatus::from_name(raw).map_or_else(|| Self::Unknown(raw.to_owned()), Self::Status))
    }
}

/// Parameters for one tab render.
#[derive(Debug, Clone)]
pub struct QueueQuery {
    /// Active tab.
    pub category: Category,
    /// Case-insensitive search over name, vehicle and email. Empty passes all.
    pub search: String,
    /// Ordering.
    pub sort: SortKey,
    /// Priority or status filter.
    pub filter: LeadFilter,
}

impl Default for QueueQuery {
    fn default() -> Self {
        Self {
            category: Category::All,
            search: String::new(),
            sort: SortKey::default(),
            filter: LeadFilter::default(),
        }
    }
}

/// A lead with the labels the display surface renders next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry<'a> {
    /// The lead.
    pub lead: &'a Lead,
    /// Urgency score.
    pub score: i64,
    /// Work-queue bucket.
    pub category: Category,
}

/// All leads grouped by bucket, each group in input order.
#[derive(Debug, Clone, Default)]
pub struct Partition<'a> {
    all: Vec<QueueEntry<'a>>,
    buckets: HashMap<Category, Vec<QueueEntry<'a>>>,
}

impl<'a> Partition<'a> {
    /// Entries in `category`, or every entry for [`Category::All`].
    #[must_use]
    pub fn bucket(&self, category: Category) -> &[QueueEntry<'a>] {
        if category == Category::All {
            return &self.all;
        }
        self.buckets.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Number of leads across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Whether no leads were partitioned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Score and categorize every lead in a single pass.
///
/// # Errors
///
/// Returns `AppError::MalformedLead` on the first lead that violates a
/// data-model invariant.
pub fn partition<'a, I>(leads: I, scorer: &PriorityScorer) -> Result<Partition<'a>>
where
    I: IntoIterator<Item = &'a Lead>,
{
    let mut out = Partition::default();
    for lead in leads {
        let category = scorer.category(lead)?;
        let entry = QueueEntry {
            lead,
            score: scorer.score_valid(lead),
            category,
        };
        out.buckets.entry(category).or_default().push(entry);
        out.all.push(entry);
    }
    Ok(out)
}

/// Produce the ordered slice of leads to render for one tab.
///
/// # Errors
///
/// Returns `AppError::MalformedLead` if any input lead violates a
/// data-model invariant.
pub fn run<'a, I>(
    leads: I,
    query: &QueueQuery,
    scorer: &PriorityScorer,
) -> Result<Vec<QueueEntry<'a>>>
where
    I: IntoIterator<Item = &'a Lead>,
{
    let _span = info_span!(
        "queue_pipeline",
        category = %query.category,
        sort = ?query.sort,
    )
    .entered();

    let grouped = partition(leads, scorer)?;
    let needle = query.search.to_lowercase();

    let mut selected: Vec<QueueEntry<'a>> = grouped
        .bucket(query.category)
        .iter()
        .filter(|entry| matches_search(entry.lead, &needle))
        .filter(|entry| query.filter.matches(entry.lead))
        .copied()
        .collect();

    // All four sorts are stable, so ties keep input order.
    match query.sort {
        SortKey::Priority => selected.sort_by_key(|entry| Reverse(entry.score)),
        SortKey::Value => selected.sort_by_key(|entry| Reverse(entry.lead.value)),
        SortKey::Activity => selected.sort_by(|a, b| {
            a.lead
                .last_activity
                .summary
                .cmp(&b.lead.last_activity.summary)
        }),
        SortKey::Status => selected.sort_by_key(|entry| entry.lead.status.rank()),
    }

    debug!(
        total = grouped.len(),
        selected = selected.len(),
        "queue pipeline complete"
    );
    Ok(selected)
}

/// Case-insensitive match of an already-lowercased needle.
fn matches_search(lead: &Lead, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [&lead.name, &lead.vehicle, &lead.email]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}
