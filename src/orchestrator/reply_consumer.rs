//! Reply event consumer: applies [`ReplyEvent`]s to the lead store.
//!
//! Reads events from the simulator's `mpsc::Receiver<ReplyEvent>` and, for
//! each one, advances the lead's journey stage and appends the customer's
//! message to the log. Replies whose lead has moved on since the message
//! was sent are discarded, as are replies for leads removed in the
//! meantime; neither changes any state.

use chrono::Utc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::reply_simulator::ReplyEvent;
use crate::models::message::Message;
use crate::store::lead_store::{ReplyOutcome, SharedLeadStore};
use crate::store::message_log::SharedMessageLog;

/// What happened to one reply event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyReport {
    /// Lead the reply was for.
    pub lead_id: String,
    /// Effect on the lead.
    pub outcome: ReplyOutcome,
}

/// Spawn a background task that applies reply events to the store.
///
/// The task runs until the `CancellationToken` fires or the event channel
/// closes. A [`ReplyReport`] is sent on `report_tx` for every event; a
/// closed report channel is ignored.
///
/// # Arguments
///
/// * `rx`: Receiving end of the reply event channel.
/// * `store`: Shared lead store.
/// * `log`: Shared message log.
/// * `report_tx`: Per-event outcome notifications for the display surface.
/// * `cancel`: Cancellation token for graceful shutdown.
#[must_use]
pub fn spawn_reply_consumer(
    mut rx: mpsc::Receiver<ReplyEvent>,
    store: SharedLeadStore,
    log: SharedMessageLog,
    report_tx: mpsc::Sender<ReplyReport>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                () = cancel.cancelled() => {
                    info!("reply consumer shutting down");
                    break;
                }
                maybe_event = rx.recv() => {
                    if let Some(e) = maybe_event { e } else {
                        info!("reply event channel closed");
                        break;
                    }
                }
            };

            let now = Utc::now();
            let summary = format!("Customer replied via {}", event.channel);
            // Held until the inbound message is logged so lead removal can
            // never interleave between the stage change and the log write.
            let mut guard = store.lock().await;
            let outcome = guard.apply_reply(&event.lead_id, event.captured_stage, &summary, now);

            match outcome {
                ReplyOutcome::Advanced { from, to } => {
                    info!(lead_id = %event.lead_id, %from, %to, "reply applied");
                    log.lock().await.append(Message::inbound(
                        event.lead_id.clone(),
                        event.channel,
                        event.content,
                        now,
                    ));
                }
                ReplyOutcome::Stale { captured, current } => {
                    info!(
                        lead_id = %event.lead_id,
                        %captured,
                        %current,
                        "stale reply discarded"
                    );
                }
                ReplyOutcome::Orphaned => {
                    warn!(lead_id = %event.lead_id, "reply for unknown lead discarded");
                }
            }

            drop(guard);

            let _ = report_tx
                .send(ReplyReport {
                    lead_id: event.lead_id,
                    outcome,
                })
                .await;
        }
    })
}
