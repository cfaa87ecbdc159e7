//! Core types used throughout the system
//!
//! These are fundamental identifier types used by all modules.
//! They provide semantic meaning and enable future type evolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account ID - primary key for a ledger account.
///
/// # Constraints:
/// - **Immutable**: Once assigned, NEVER changes
/// - One account per organization, created at organization creation
pub type AccountId = u64;

/// Organization ID - globally unique, immutable after assignment.
pub type OrgId = u64;

/// Beneficiary ID - unique within the system.
pub type BeneficiaryId = u64;

/// Payout record ID - ULID-based unique identifier
///
/// Using ULID provides:
/// - Monotonic, sortable IDs
/// - No coordination needed (no machine_id)
/// - 128-bit with good entropy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayoutId(ulid::Ulid);

impl PayoutId {
    /// Generate a new unique PayoutId
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Get the inner ULID value
    pub fn inner(&self) -> ulid::Ulid {
        self.0
    }
}

impl Default for PayoutId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PayoutId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}
