//! Work-queue views over the lead collection.

pub mod pipeline;
pub mod summary;
