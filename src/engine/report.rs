//! Reconciliation report: the account's money movements flattened into
//! CREDIT/DEBIT entries with counterparty names.

use serde::Serialize;

use super::transfer::TransferEngine;
use crate::core_types::AccountId;
use crate::money;
use crate::payout::PayoutKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryDirection {
    Credit,
    Debit,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationEntry {
    pub id: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub direction: EntryDirection,
    /// Display amount, full currency precision.
    pub amount: String,
    pub currency: String,
    pub status: String,
    pub description: Option<String>,
    pub counterparty: Option<String>,
    pub category: &'static str,
}

impl TransferEngine {
    /// Movements visible to one account, newest first.
    pub fn reconciliation_report(&self, account_id: AccountId) -> Vec<ReconciliationEntry> {
        self.payouts()
            .list_for_account(account_id)
            .into_iter()
            .map(|record| {
                let (direction, counterparty, category) = match &record.kind {
                    PayoutKind::Internal { sender, receiver } => {
                        let incoming = *receiver == account_id;
                        let other = if incoming { *sender } else { *receiver };
                        let name = self
                            .directory()
                            .get_org_by_account(other)
                            .map(|o| o.name);
                        (
                            if incoming {
                                EntryDirection::Credit
                            } else {
                                EntryDirection::Debit
                            },
                            name,
                            "Internal Transfer",
                        )
                    }
                    PayoutKind::External { beneficiary, .. } => (
                        EntryDirection::Debit,
                        self.directory()
                            .get_beneficiary(*beneficiary)
                            .map(|b| b.name),
                        "External Payout",
                    ),
                    PayoutKind::Deposit { .. } => {
                        (EntryDirection::Credit, None, "Deposit")
                    }
                };

                let decimals = money::currency_decimals(&record.currency).unwrap_or(2);
                ReconciliationEntry {
                    id: record.payout_id.to_string(),
                    date: record.created_at,
                    direction,
                    amount: money::format_amount(record.amount, decimals),
                    currency: record.currency,
                    status: record.status.to_string(),
                    description: record.description,
                    counterparty,
                    category,
                }
            })
            .collect()
    }
}
