//! Lead ranking: urgency score and work-queue categorization.

pub mod categorizer;
pub mod scorer;
pub mod weights;
