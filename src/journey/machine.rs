//! Linear journey-stage transitions.
//!
//! `engaged → visit → proposal → sold → delivered`. No branching, no
//! skipping; `delivered` is terminal and advancing from it is a no-op.
//! The machine holds no state: callers persist the returned stage.

use serde::Serialize;

use crate::models::journey::JourneyStage;
use crate::Result;

/// Successor in the fixed sequence, or `stage` itself when terminal.
#[must_use]
pub fn advance(stage: JourneyStage) -> JourneyStage {
    JourneyStage::ALL
        .get(stage.index() + 1)
        .copied()
        .unwrap_or(stage)
}

/// Parse a stage name and advance it.
///
/// # Errors
///
/// Returns `AppError::InvalidState` if `raw` is not one of the five stages.
pub fn advance_named(raw: &str) -> Result<JourneyStage> {
    Ok(advance(raw.parse::<JourneyStage>()?))
}

/// Action owed to the customer while a lead sits in `stage`.
#[must_use]
pub fn next_task(stage: JourneyStage) -> Option<&'static str> {
    match stage {
        JourneyStage::Engaged => Some("Book a showroom visit or test drive"),
        JourneyStage::Visit => Some("Prepare a purchase proposal"),
        JourneyStage::Proposal => Some("Finalize financing and paperwork"),
        JourneyStage::Sold => Some("Schedule vehicle delivery"),
        JourneyStage::Delivered => None,
    }
}

/// Timeline view of a lead's journey.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StageView {
    /// Stage the lead is in.
    pub current: JourneyStage,
    /// Stages already passed, in order.
    pub completed: Vec<JourneyStage>,
    /// Stages still ahead, in order.
    pub pending: Vec<JourneyStage>,
    /// Action owed at the current stage.
    pub next_task: Option<&'static str>,
    /// Share of the journey reached, derived from the stage index only.
    pub progress_percent: u8,
}

impl StageView {
    /// Build the view for `stage`.
    #[must_use]
    pub fn for_stage(stage: JourneyStage) -> Self {
        let index = stage.index();
        Self {
            current: stage,
            completed: JourneyStage::ALL[..index].to_vec(),
            pending: JourneyStage::ALL[index + 1..].to_vec(),
            next_task: next_task(stage),
            progress_percent: progress_percent(stage),
        }
    }
}

/// `(index + 1) / stage count`, as a whole percentage.
fn progress_percent(stage: JourneyStage) -> u8 {
    let reached = stage.index() + 1;
    let percent = reached * 100 / JourneyStage::ALL.len();
    u8::try_from(percent).unwrap_or(100)
}
