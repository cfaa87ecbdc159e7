//! Payout/Transfer record - persisted representation of one money movement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::PayoutStatus;
use crate::core_types::{AccountId, BeneficiaryId, OrgId, PayoutId};

/// Kind-specific references of a money movement.
///
/// Modeled as a tagged variant rather than one record shape with optional
/// sender/receiver/organization/beneficiary fields: the compiler enforces
/// which references each kind carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutKind {
    /// Peer-to-peer transfer between two ledger accounts. Settles
    /// synchronously: the record exists only as COMPLETED.
    Internal {
        sender: AccountId,
        receiver: AccountId,
    },
    /// Payout to a registered beneficiary via the external provider.
    /// Created PENDING; transitions only through the reconciler.
    External {
        organization: OrgId,
        beneficiary: BeneficiaryId,
        /// Provider-side order id; reconciliation key for callbacks.
        external_id: String,
    },
    /// Wallet top-up. Created COMPLETED.
    Deposit { account: AccountId },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutRecord {
    pub payout_id: PayoutId,
    #[serde(flatten)]
    pub kind: PayoutKind,
    /// Positive amount in currency minor units.
    pub amount: u64,
    pub currency: String,
    pub status: PayoutStatus,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PayoutRecord {
    pub fn new(
        kind: PayoutKind,
        amount: u64,
        currency: &str,
        status: PayoutStatus,
        description: Option<String>,
    ) -> Self {
        Self::with_id(PayoutId::new(), kind, amount, currency, status, description)
    }

    /// Build a record under a caller-allocated id. The engine allocates the
    /// id before moving money so ledger idempotency keys can reference it.
    pub fn with_id(
        payout_id: PayoutId,
        kind: PayoutKind,
        amount: u64,
        currency: &str,
        status: PayoutStatus,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            payout_id,
            kind,
            amount,
            currency: currency.to_string(),
            status,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Provider-side id, if this movement has one.
    pub fn external_id(&self) -> Option<&str> {
        match &self.kind {
            PayoutKind::External { external_id, .. } => Some(external_id),
            _ => None,
        }
    }

    /// Does this record's amount touch the given ledger account?
    pub fn involves_account(&self, account_id: AccountId) -> bool {
        match &self.kind {
            PayoutKind::Internal { sender, receiver } => {
                *sender == account_id || *receiver == account_id
            }
            // External payouts debit the organization account (same id)
            PayoutKind::External { organization, .. } => *organization == account_id,
            PayoutKind::Deposit { account } => *account == account_id,
        }
    }
}
