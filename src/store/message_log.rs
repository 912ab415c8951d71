//! In-memory message history per lead.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::models::message::Message;

/// Message log shared between the messenger and the reply consumer.
pub type SharedMessageLog = Arc<Mutex<MessageLog>>;

/// Messages grouped by lead, oldest first.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    threads: HashMap<String, Vec<Message>>,
}

impl MessageLog {
    /// Empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into the shared handle used by background tasks.
    #[must_use]
    pub fn into_shared(self) -> SharedMessageLog {
        Arc::new(Mutex::new(self))
    }

    /// Append a message to its lead's thread.
    pub fn append(&mut self, message: Message) {
        self.threads
            .entry(message.lead_id.clone())
            .or_default()
            .push(message);
    }

    /// Conversation with one lead.
    #[must_use]
    pub fn thread(&self, lead_id: &str) -> &[Message] {
        self.threads.get(lead_id).map_or(&[], Vec::as_slice)
    }

    /// Drop a lead's conversation.
    pub fn remove_lead(&mut self, lead_id: &str) {
        self.threads.remove(lead_id);
    }
}
