//! In-memory lead collection owned by the dashboard session.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{info, info_span};

use crate::journey::machine::advance;
use crate::models::activity::Activity;
use crate::models::journey::JourneyStage;
use crate::models::lead::{Lead, LeadStatus};
use crate::models::message::Channel;
use crate::{AppError, Result};

/// Advisory progress added per outbound contact.
const CONTACT_PROGRESS_STEP: u8 = 15;

/// Lead store shared between the dashboard and the reply consumer.
pub type SharedLeadStore = Arc<Mutex<LeadStore>>;

/// Result of applying a simulated customer reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Stage advanced (or held at the terminal stage) and status qualified.
    Advanced {
        /// Stage before the reply.
        from: JourneyStage,
        /// Stage after the reply.
        to: JourneyStage,
    },
    /// The lead moved on since the message was sent; nothing changed.
    Stale {
        /// Stage recorded when the message was sent.
        captured: JourneyStage,
        /// Stage the lead is in now.
        current: JourneyStage,
    },
    /// The lead no longer exists.
    Orphaned,
}

/// Leads keyed by id, iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct LeadStore {
    leads: HashMap<String, Lead>,
    order: Vec<String>,
}

impl LeadStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an initial collection.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MalformedLead` for an invalid lead or a duplicate id.
    pub fn from_leads(leads: impl IntoIterator<Item = Lead>) -> Result<Self> {
        let mut store = Self::new();
        for lead in leads {
            if store.leads.contains_key(&lead.id) {
                return Err(AppError::MalformedLead(format!(
                    "duplicate lead id {}",
                    lead.id
                )));
            }
            store.insert(lead)?;
        }
        Ok(store)
    }

    /// Wrap into the shared handle used by background tasks.
    #[must_use]
    pub fn into_shared(self) -> SharedLeadStore {
        Arc::new(Mutex::new(self))
    }

    /// Add a lead, replacing any existing lead with the same id in place.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MalformedLead` if the lead is invalid.
    pub fn insert(&mut self, lead: Lead) -> Result<()> {
        lead.validate()?;
        if !self.leads.contains_key(&lead.id) {
            self.order.push(lead.id.clone());
        }
        self.leads.insert(lead.id.clone(), lead);
        Ok(())
    }

    /// Look up a lead.
    #[must_use]
    pub fn get(&self, lead_id: &str) -> Option<&Lead> {
        self.leads.get(lead_id)
    }

    /// All leads in insertion order.
    pub fn leads(&self) -> impl Iterator<Item = &Lead> {
        self.order.iter().filter_map(|id| self.leads.get(id))
    }

    /// Number of leads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.leads.len()
    }

    /// Whether the store holds no leads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    /// Remove a lead, returning it if present.
    pub fn remove(&mut self, lead_id: &str) -> Option<Lead> {
        let removed = self.leads.remove(lead_id)?;
        self.order.retain(|id| id != lead_id);
        info!(lead_id, "lead removed");
        Some(removed)
    }

    /// Record an outbound contact and return the stage at send time.
    ///
    /// Sets status `contacted`, marks the activity outbound, bumps the
    /// attempt counter and adds to the advisory progress.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the lead does not exist.
    pub fn record_contact(
        &mut self,
        lead_id: &str,
        channel: Channel,
        now: DateTime<Utc>,
    ) -> Result<JourneyStage> {
        let _span = info_span!("record_contact", lead_id, %channel).entered();

        let lead = self
            .leads
            .get_mut(lead_id)
            .ok_or_else(|| AppError::NotFound(format!("lead {lead_id} not found")))?;

        lead.status = LeadStatus::Contacted;
        lead.last_activity = Activity::outbound(format!("{channel} contact sent"), now);
        lead.contact_attempts = Some(lead.contact_attempts.unwrap_or(0).saturating_add(1));
        lead.days_since_last_contact = Some(0);
        lead.stage_progress = lead
            .stage_progress
            .saturating_add(CONTACT_PROGRESS_STEP)
            .min(100);

        info!(stage = %lead.journey_stage, "contact recorded");
        Ok(lead.journey_stage)
    }

    /// Apply a customer reply to a message sent while the lead was in
    /// `captured`.
    ///
    /// The reply only takes effect if the lead is still in `captured`;
    /// otherwise it is stale and the lead is left untouched, so replies can
    /// never regress or double-advance a stage.
    pub fn apply_reply(
        &mut self,
        lead_id: &str,
        captured: JourneyStage,
        summary: &str,
        now: DateTime<Utc>,
    ) -> ReplyOutcome {
        let Some(lead) = self.leads.get_mut(lead_id) else {
            return ReplyOutcome::Orphaned;
        };
        if lead.journey_stage != captured {
            return ReplyOutcome::Stale {
                captured,
                current: lead.journey_stage,
            };
        }

        let from = lead.journey_stage;
        let to = advance(from);
        lead.journey_stage = to;
        lead.status = LeadStatus::Qualified;
        lead.last_activity = Activity::inbound(summary, now);
        ReplyOutcome::Advanced { from, to }
    }
}
