//! Messaging orchestration.
//!
//! Covers outbound sends, simulated customer replies and applying those
//! replies to the lead store.

pub mod messenger;
pub mod reply_consumer;
pub mod reply_simulator;
