//! Message model for outbound contact and simulated customer replies.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delivery channel for a message.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Phone call.
    Call,
    /// SMS.
    #[default]
    Text,
    /// Email.
    Email,
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Call => "call",
            Self::Text => "text",
            Self::Email => "email",
        })
    }
}

/// Which side sent the message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageDirection {
    /// Dealership to customer.
    Outbound,
    /// Customer to dealership.
    Inbound,
}

/// Delivery state of a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    /// Handed to the channel.
    Sent,
    /// Received from the customer.
    Received,
}

/// A single message exchanged with a lead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique record identifier.
    pub id: String,
    /// Lead the message belongs to.
    pub lead_id: String,
    /// Sender side.
    pub direction: MessageDirection,
    /// Delivery channel.
    pub channel: Channel,
    /// Message body.
    pub content: String,
    /// Delivery state.
    pub status: MessageStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Construct an outbound message with a generated identifier.
    #[must_use]
    pub fn outbound(lead_id: String, channel: Channel, content: String, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            lead_id,
            direction: MessageDirection::Outbound,
            channel,
            content,
            status: MessageStatus::Sent,
            created_at: at,
        }
    }

    /// Construct an inbound customer reply with a generated identifier.
    #[must_use]
    pub fn inbound(lead_id: String, channel: Channel, content: String, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            lead_id,
            direction: MessageDirection::Inbound,
            channel,
            content,
            status: MessageStatus::Received,
            created_at: at,
        }
    }
}
