//! Outbound messaging for the dashboard.
//!
//! Sending a message records the contact on the lead, appends the message
//! to the log and, when simulation is enabled, schedules the customer's
//! reply.

use chrono::Utc;
use tracing::{info, info_span, Instrument};

use super::reply_simulator::ReplySimulator;
use crate::models::lead::Lead;
use crate::models::message::{Channel, Message};
use crate::store::lead_store::SharedLeadStore;
use crate::store::message_log::SharedMessageLog;
use crate::{AppError, Result};

/// Sends messages to leads and owns the reply simulator.
pub struct Messenger {
    store: SharedLeadStore,
    log: SharedMessageLog,
    simulator: Option<ReplySimulator>,
}

impl Messenger {
    /// Construct a messenger. Pass `None` to disable simulated replies.
    #[must_use]
    pub fn new(
        store: SharedLeadStore,
        log: SharedMessageLog,
        simulator: Option<ReplySimulator>,
    ) -> Self {
        Self {
            store,
            log,
            simulator,
        }
    }

    /// Send `content` to a lead over `channel`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Simulation` for empty content or when the reply
    /// cannot be scheduled, and `AppError::NotFound` if the lead does not
    /// exist.
    pub async fn send_message(
        &self,
        lead_id: &str,
        content: &str,
        channel: Channel,
    ) -> Result<Message> {
        let span = info_span!("send_message", lead_id, %channel);
        async move {
            if content.trim().is_empty() {
                return Err(AppError::Simulation(
                    "message content must not be empty".into(),
                ));
            }

            // Lock order is store, then log; the reply consumer follows it too.
            let mut store = self.store.lock().await;
            let captured = store
                .get(lead_id)
                .map(|lead| lead.journey_stage)
                .ok_or_else(|| AppError::NotFound(format!("lead {lead_id} not found")))?;

            // Schedule before touching the lead so a refused reply leaves no
            // trace. The reply cannot land early: applying it needs the store
            // lock held here.
            if let Some(ref simulator) = self.simulator {
                simulator.schedule(lead_id, captured, channel)?;
            }

            let now = Utc::now();
            store.record_contact(lead_id, channel, now)?;
            let message =
                Message::outbound(lead_id.to_owned(), channel, content.to_owned(), now);
            self.log.lock().await.append(message.clone());
            drop(store);

            info!(stage = %captured, "message sent");
            Ok(message)
        }
        .instrument(span)
        .await
    }

    /// Remove a lead, its conversation and any pending replies.
    ///
    /// The lead and its thread go under one store lock, so a reply already
    /// in flight either lands before removal and is wiped with it, or finds
    /// the lead gone and is discarded.
    pub async fn remove_lead(&self, lead_id: &str) -> Option<Lead> {
        if let Some(ref simulator) = self.simulator {
            simulator.cancel_lead(lead_id);
        }
        let mut store = self.store.lock().await;
        let removed = store.remove(lead_id);
        self.log.lock().await.remove_lead(lead_id);
        removed
    }

    /// Stop the reply simulator and wait for its workers.
    pub async fn shutdown(self) {
        if let Some(simulator) = self.simulator {
            simulator.shutdown().await;
        }
    }
}
