//! Simulated customer replies with per-lead ordering and cancellation.
//!
//! Every outbound message schedules one reply, due a fixed delay after
//! that message was sent. A lead with pending replies gets its own worker
//! task that drains a FIFO queue, sleeping until each reply's due time in
//! turn, so replies for one lead are always emitted in send order. The
//! worker exits when the queue runs dry and is respawned on the next send.
//!
//! Pending replies never outlive their owner: [`ReplySimulator::cancel_lead`]
//! drops a single lead's queue, dropping the simulator cancels every
//! worker, and cancelling the parent token passed to
//! [`ReplySimulator::new`] tears down the whole session.
//!
//! Events are delivered via a `tokio::sync::mpsc` channel; see
//! [`spawn_reply_consumer`](super::reply_consumer::spawn_reply_consumer).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, Instrument};

use crate::models::journey::JourneyStage;
use crate::models::message::Channel;
use crate::{AppError, Result};

/// A simulated customer reply, ready to be applied to the lead store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyEvent {
    /// Lead the reply belongs to.
    pub lead_id: String,
    /// Stage the lead was in when the outbound message was sent.
    pub captured_stage: JourneyStage,
    /// Channel the reply arrives on.
    pub channel: Channel,
    /// Reply text.
    pub content: String,
}

/// Canned customer reply for a message sent while the lead was in `stage`.
#[must_use]
pub fn reply_text(stage: JourneyStage) -> &'static str {
    match stage {
        JourneyStage::Engaged => {
            "Thanks for reaching out! Could I come by this weekend for a test drive?"
        }
        JourneyStage::Visit => "Loved the test drive. Can you send over numbers on that one?",
        JourneyStage::Proposal => "That offer works for me. What do you need to finalize?",
        JourneyStage::Sold => "Great news. When can I pick it up?",
        JourneyStage::Delivered => "Thanks again, really enjoying the car!",
    }
}

#[derive(Debug)]
struct ScheduledReply {
    due: Instant,
    captured_stage: JourneyStage,
    channel: Channel,
}

struct LeadWorker {
    queue: mpsc::UnboundedSender<ScheduledReply>,
    cancel: CancellationToken,
    join_handle: JoinHandle<()>,
}

/// Schedules simulated replies and owns the per-lead worker tasks.
pub struct ReplySimulator {
    delay: Duration,
    event_tx: mpsc::Sender<ReplyEvent>,
    cancel: CancellationToken,
    workers: Mutex<HashMap<String, LeadWorker>>,
}

impl ReplySimulator {
    /// Construct a simulator. Workers are spawned lazily on first schedule.
    ///
    /// `cancel` is the session token; every worker runs on a child of it.
    #[must_use]
    pub fn new(
        delay: Duration,
        event_tx: mpsc::Sender<ReplyEvent>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            delay,
            event_tx,
            cancel,
            workers: Mutex::new(HashMap::new()),
        }
    }

    /// Delay between a send and its reply.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Queue a reply for a message just sent to `lead_id`.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Simulation` if the session has been cancelled or
    /// the worker registry is unavailable.
    pub fn schedule(
        &self,
        lead_id: &str,
        captured_stage: JourneyStage,
        channel: Channel,
    ) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(AppError::Simulation(
                "reply simulation already shut down".into(),
            ));
        }

        let mut workers = self
            .workers
            .lock()
            .map_err(|_| AppError::Simulation("reply worker registry poisoned".into()))?;
        workers.retain(|_, worker| !worker.join_handle.is_finished());

        let mut reply = ScheduledReply {
            due: Instant::now() + self.delay,
            captured_stage,
            channel,
        };

        if let Some(worker) = workers.get(lead_id) {
            match worker.queue.send(reply) {
                Ok(()) => {
                    debug!(lead_id, %captured_stage, "reply queued");
                    return Ok(());
                }
                // Worker drained its queue and closed it; replace it below.
                Err(mpsc::error::SendError(returned)) => reply = returned,
            }
        }

        let worker = self.spawn_worker(lead_id, reply);
        workers.insert(lead_id.to_owned(), worker);
        debug!(lead_id, %captured_stage, "reply queued on new worker");
        Ok(())
    }

    /// Drop every pending reply for one lead.
    ///
    /// Returns `true` if the lead had a worker.
    pub fn cancel_lead(&self, lead_id: &str) -> bool {
        let removed = match self.workers.lock() {
            Ok(mut workers) => workers.remove(lead_id),
            Err(_) => None,
        };
        match removed {
            Some(worker) => {
                worker.cancel.cancel();
                info!(lead_id, "pending replies cancelled");
                true
            }
            None => false,
        }
    }

    /// Number of leads with replies still pending.
    #[must_use]
    pub fn active_leads(&self) -> usize {
        self.workers.lock().map_or(0, |workers| {
            workers
                .values()
                .filter(|worker| !worker.join_handle.is_finished())
                .count()
        })
    }

    /// Cancel every worker and wait for them to exit.
    pub async fn shutdown(self) {
        let drained: Vec<LeadWorker> = match self.workers.lock() {
            Ok(mut workers) => workers.drain().map(|(_, worker)| worker).collect(),
            Err(_) => Vec::new(),
        };
        for worker in drained {
            worker.cancel.cancel();
            let _ = worker.join_handle.await;
        }
    }

    fn spawn_worker(&self, lead_id: &str, first: ScheduledReply) -> LeadWorker {
        let (queue, rx) = mpsc::unbounded_channel();
        let cancel = self.cancel.child_token();
        let join_handle = tokio::spawn(
            Self::run(
                lead_id.to_owned(),
                first,
                rx,
                self.event_tx.clone(),
                cancel.clone(),
            )
            .instrument(info_span!("reply_worker", lead_id)),
        );
        LeadWorker {
            queue,
            cancel,
            join_handle,
        }
    }

    /// Worker loop: emit each queued reply at its due time, in order.
    ///
    /// The worker exits once its queue is empty, so idle leads hold no task.
    async fn run(
        lead_id: String,
        first: ScheduledReply,
        mut rx: mpsc::UnboundedReceiver<ScheduledReply>,
        event_tx: mpsc::Sender<ReplyEvent>,
        cancel: CancellationToken,
    ) {
        let mut pending = Some(first);
        while let Some(next) = pending.take() {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!(stage = %next.captured_stage, "pending reply cancelled");
                    return;
                }
                () = tokio::time::sleep_until(next.due) => {}
            }

            let event = ReplyEvent {
                lead_id: lead_id.clone(),
                captured_stage: next.captured_stage,
                channel: next.channel,
                content: reply_text(next.captured_stage).to_owned(),
            };
            info!(stage = %next.captured_stage, "simulated reply arrived");
            if event_tx.send(event).await.is_err() {
                debug!("reply event channel closed");
                return;
            }

            pending = Self::next_queued(&mut rx);
        }
        debug!("reply queue drained");
    }

    /// Pop the next queued reply. When the queue is empty it is closed, so
    /// later sends fail and [`ReplySimulator::schedule`] spawns a fresh
    /// worker; replies that slipped in before the close are still drained.
    fn next_queued(rx: &mut mpsc::UnboundedReceiver<ScheduledReply>) -> Option<ScheduledReply> {
        if let Ok(reply) = rx.try_recv() {
            return Some(reply);
        }
        rx.close();
        rx.try_recv().ok()
    }
}

impl Drop for ReplySimulator {
    /// Cancel all worker tasks when the simulator is dropped.
    fn drop(&mut self) {
        if let Ok(workers) = self.workers.get_mut() {
            for worker in workers.values() {
                worker.cancel.cancel();
            }
        }
    }
}
