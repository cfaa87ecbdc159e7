//! Payout Status Reconciler
//!
//! Single entry point for provider-side status signals (webhooks or the
//! mock-api simulate route). Transitions are monotonic - a record never
//! moves backwards and terminal states never change. A transition to
//! FAILED reverses the initiation debit exactly once.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::directory::DirectoryStore;
use crate::ledger::LedgerStore;
use crate::payout::{PayoutKind, PayoutStatus, PayoutStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The transition was applied.
    Applied,
    /// Duplicate, stale or non-monotonic signal; nothing changed.
    NoChange,
    /// No record carries this external id.
    Unknown,
}

pub struct Reconciler {
    payouts: Arc<PayoutStore>,
    ledger: Arc<LedgerStore>,
    directory: Arc<DirectoryStore>,
}

impl Reconciler {
    pub fn new(
        payouts: Arc<PayoutStore>,
        ledger: Arc<LedgerStore>,
        directory: Arc<DirectoryStore>,
    ) -> Self {
        Self {
            payouts,
            ledger,
            directory,
        }
    }

    /// Apply one provider status signal to the record carrying
    /// `external_id`.
    ///
    /// Never fails toward the caller: callbacks can race record creation,
    /// arrive duplicated, or arrive out of order, and all of those resolve
    /// to `Unknown` or `NoChange`.
    pub fn apply_external_status(
        &self,
        external_id: &str,
        status: PayoutStatus,
        event_ts: Option<DateTime<Utc>>,
    ) -> ReconcileOutcome {
        // Bounded retry: a lost CAS means another delivery advanced the
        // record; re-read and re-evaluate against the new state.
        for _ in 0..4 {
            let record = match self.payouts.get_by_external_id(external_id) {
                Some(r) => r,
                None => {
                    info!(external_id, status = %status, "status signal for unknown external id");
                    return ReconcileOutcome::Unknown;
                }
            };

            if record.status.is_terminal() {
                return ReconcileOutcome::NoChange;
            }
            if !record.status.can_transition_to(status) {
                info!(
                    external_id,
                    current = %record.status,
                    incoming = %status,
                    "non-monotonic status signal ignored"
                );
                return ReconcileOutcome::NoChange;
            }

            if !self
                .payouts
                .update_status_if(record.payout_id, record.status, status)
            {
                // Lost the race with a concurrent delivery.
                continue;
            }

            if status == PayoutStatus::Failed {
                self.reverse_debit(&record);
            }

            info!(
                external_id,
                payout_id = %record.payout_id,
                from = %record.status,
                to = %status,
                event_ts = ?event_ts,
                "payout status reconciled"
            );
            return ReconcileOutcome::Applied;
        }

        warn!(external_id, status = %status, "reconcile retries exhausted");
        ReconcileOutcome::NoChange
    }

    /// Credit the initiation debit back after a FAILED transition. The
    /// idempotency key ties the reversal to the external id, so even a
    /// re-driven FAILED transition cannot credit twice.
    fn reverse_debit(&self, record: &crate::payout::PayoutRecord) {
        let PayoutKind::External {
            organization,
            external_id,
            ..
        } = &record.kind
        else {
            return;
        };

        let Some(org) = self.directory.get_org(*organization) else {
            error!(
                payout_id = %record.payout_id,
                organization,
                "REVERSAL FAILED - organization missing from directory"
            );
            return;
        };

        let delta = match i64::try_from(record.amount) {
            Ok(d) => d,
            Err(_) => {
                error!(payout_id = %record.payout_id, "REVERSAL FAILED - amount exceeds i64");
                return;
            }
        };

        let key = format!("reversal:{external_id}");
        match self.ledger.adjust(org.account_id, delta, Some(&key)) {
            Ok(new_balance) => {
                info!(
                    payout_id = %record.payout_id,
                    account_id = org.account_id,
                    amount = record.amount,
                    new_balance,
                    "failed payout reversed"
                );
            }
            Err(e) => {
                // The record still moves to FAILED; the missing credit is an
                // operational incident, not a provider-facing error.
                error!(
                    payout_id = %record.payout_id,
                    account_id = org.account_id,
                    amount = record.amount,
                    error = %e,
                    "REVERSAL FAILED - debit not restored"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::ComplianceStatus;
    use crate::payout::PayoutRecord;

    struct Fixture {
        reconciler: Reconciler,
        ledger: Arc<LedgerStore>,
        payouts: Arc<PayoutStore>,
        account_id: u64,
    }

    /// One org with a funded account and one PENDING external payout of 100
    /// already debited, carrying external id `ord_1`.
    fn fixture() -> Fixture {
        let ledger = Arc::new(LedgerStore::new());
        let payouts = Arc::new(PayoutStore::new());
        let directory = Arc::new(DirectoryStore::new());

        let org = directory
            .create_organization("Org", "ACC-1", ComplianceStatus::Verified)
            .unwrap();
        ledger.open_account(org.account_id);
        ledger.adjust(org.account_id, 1000, None).unwrap();
        ledger
            .adjust(org.account_id, -100, Some("payout:ord_1"))
            .unwrap();
        payouts.insert(PayoutRecord::new(
            PayoutKind::External {
                organization: org.org_id,
                beneficiary: 1,
                external_id: "ord_1".to_string(),
            },
            100,
            "USD",
            PayoutStatus::Pending,
            None,
        ));

        Fixture {
            reconciler: Reconciler::new(payouts.clone(), ledger.clone(), directory),
            ledger,
            payouts,
            account_id: org.account_id,
        }
    }

    #[test]
    fn test_completed_transition_applies_once() {
        let f = fixture();

        assert_eq!(
            f.reconciler
                .apply_external_status("ord_1", PayoutStatus::Completed, None),
            ReconcileOutcome::Applied
        );
        assert_eq!(
            f.payouts.get_by_external_id("ord_1").unwrap().status,
            PayoutStatus::Completed
        );
        // Duplicate delivery
        assert_eq!(
            f.reconciler
                .apply_external_status("ord_1", PayoutStatus::Completed, None),
            ReconcileOutcome::NoChange
        );
        // Completed payouts never credit back
        assert_eq!(f.ledger.balance_of(f.account_id).unwrap(), 900);
    }

    #[test]
    fn test_unknown_external_id() {
        let f = fixture();
        assert_eq!(
            f.reconciler
                .apply_external_status("ord_nope", PayoutStatus::Completed, None),
            ReconcileOutcome::Unknown
        );
    }

    #[test]
    fn test_non_monotonic_signals_ignored() {
        let f = fixture();

        assert_eq!(
            f.reconciler
                .apply_external_status("ord_1", PayoutStatus::Processing, None),
            ReconcileOutcome::Applied
        );
        // Backwards to PENDING
        assert_eq!(
            f.reconciler
                .apply_external_status("ord_1", PayoutStatus::Pending, None),
            ReconcileOutcome::NoChange
        );
        assert_eq!(
            f.payouts.get_by_external_id("ord_1").unwrap().status,
            PayoutStatus::Processing
        );
    }

    #[test]
    fn test_failed_reverses_debit_exactly_once() {
        let f = fixture();

        assert_eq!(
            f.reconciler
                .apply_external_status("ord_1", PayoutStatus::Failed, None),
            ReconcileOutcome::Applied
        );
        assert_eq!(f.ledger.balance_of(f.account_id).unwrap(), 1000);

        // A replayed FAILED is terminal-blocked, and even if the credit were
        // re-attempted the idempotency key absorbs it.
        assert_eq!(
            f.reconciler
                .apply_external_status("ord_1", PayoutStatus::Failed, None),
            ReconcileOutcome::NoChange
        );
        assert_eq!(f.ledger.balance_of(f.account_id).unwrap(), 1000);
    }

    #[test]
    fn test_terminal_records_never_move() {
        let f = fixture();
        f.reconciler
            .apply_external_status("ord_1", PayoutStatus::Failed, None);

        assert_eq!(
            f.reconciler
                .apply_external_status("ord_1", PayoutStatus::Completed, None),
            ReconcileOutcome::NoChange
        );
        assert_eq!(
            f.payouts.get_by_external_id("ord_1").unwrap().status,
            PayoutStatus::Failed
        );
    }
}
