//! Journey stage model.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// One of the five ordered phases a lead passes through.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JourneyStage {
    /// Customer has engaged with the dealership; initial stage.
    Engaged,
    /// Customer visit or test drive.
    Visit,
    /// Offer presented.
    Proposal,
    /// Deal signed.
    Sold,
    /// Vehicle handed over; terminal stage.
    Delivered,
}

impl JourneyStage {
    /// All stages in journey order.
    pub const ALL: [Self; 5] = [
        Self::Engaged,
        Self::Visit,
        Self::Proposal,
        Self::Sold,
        Self::Delivered,
    ];

    /// Zero-based position in the journey.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Engaged => 0,
            Self::Visit => 1,
            Self::Proposal => 2,
            Self::Sold => 3,
            Self::Delivered => 4,
        }
    }

    /// Wire name used in seed files and CLI output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Engaged => "engaged",
            Self::Visit => "visit",
            Self::Proposal => "proposal",
            Self::Sold => "sold",
            Self::Delivered => "delivered",
        }
    }

    /// Whether no further stage follows.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Delivered
    }
}

impl Display for JourneyStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JourneyStage {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == raw)
            .ok_or_else(|| AppError::InvalidState(format!("unknown journey stage '{raw}'")))
    }
}
