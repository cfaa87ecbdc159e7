//! Payout status state machine.
//!
//! PENDING -> PROCESSING -> COMPLETED, or PENDING/PROCESSING -> FAILED.
//! COMPLETED and FAILED are terminal: once reached, further signals are
//! accepted but never change state and never regress.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutStatus {
    /// Initiated, awaiting provider confirmation
    Pending,
    /// Provider picked the payout up
    Processing,
    /// Terminal: settled
    Completed,
    /// Terminal: provider rejected or settlement failed
    Failed,
}

impl PayoutStatus {
    /// Check if this is a terminal state (no more transitions possible)
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, PayoutStatus::Completed | PayoutStatus::Failed)
    }

    /// Monotonic transition check: may a record in `self` move to `next`?
    pub fn can_transition_to(&self, next: PayoutStatus) -> bool {
        match (self, next) {
            (PayoutStatus::Pending, PayoutStatus::Processing)
            | (PayoutStatus::Pending, PayoutStatus::Completed)
            | (PayoutStatus::Pending, PayoutStatus::Failed)
            | (PayoutStatus::Processing, PayoutStatus::Completed)
            | (PayoutStatus::Processing, PayoutStatus::Failed) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutStatus::Pending => "PENDING",
            PayoutStatus::Processing => "PROCESSING",
            PayoutStatus::Completed => "COMPLETED",
            PayoutStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PayoutStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PayoutStatus::Pending),
            "PROCESSING" => Ok(PayoutStatus::Processing),
            "COMPLETED" => Ok(PayoutStatus::Completed),
            "FAILED" => Ok(PayoutStatus::Failed),
            _ => Err(format!("Invalid payout status: {}", s)),
        }
    }
}
