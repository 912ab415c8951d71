#![forbid(unsafe_code)]

//! Dealership lead prioritization and journey-stage engine.
//!
//! Ranks leads into work-queue tabs, tracks each lead through the sales
//! journey, and simulates customer replies to outbound messages.

pub mod config;
pub mod config_watcher;
pub mod errors;
pub mod journey;
pub mod models;
pub mod orchestrator;
pub mod queue;
pub mod scoring;
pub mod store;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
