//! In-memory session state: leads, messages and seed loading.

pub mod lead_store;
pub mod message_log;
pub mod seed;
