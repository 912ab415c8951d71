//! Domain model module declarations.

pub mod activity;
pub mod journey;
pub mod lead;
pub mod message;
