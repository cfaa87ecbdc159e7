//! Transfer Engine
//!
//! Validates and executes money movements: internal peer-to-peer transfers
//! (synchronous settlement) and external payout initiation (asynchronous,
//! reconciled via webhook). All balance mutation goes through the Ledger
//! Store; any failure after a partial mutation triggers a compensating
//! mutation - money is never left half-applied.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::error::TransferError;
use crate::core_types::{AccountId, BeneficiaryId, OrgId, PayoutId};
use crate::directory::{Beneficiary, ComplianceStatus, DirectoryStore};
use crate::ledger::LedgerStore;
use crate::money;
use crate::payout::{PayoutKind, PayoutRecord, PayoutStatus, PayoutStore};
use crate::provider::{BeneficiaryRequest, PayoutProvider};

pub struct TransferEngine {
    ledger: Arc<LedgerStore>,
    payouts: Arc<PayoutStore>,
    directory: Arc<DirectoryStore>,
    provider: Arc<dyn PayoutProvider>,
}

impl TransferEngine {
    pub fn new(
        ledger: Arc<LedgerStore>,
        payouts: Arc<PayoutStore>,
        directory: Arc<DirectoryStore>,
        provider: Arc<dyn PayoutProvider>,
    ) -> Self {
        Self {
            ledger,
            payouts,
            directory,
            provider,
        }
    }

    pub fn ledger(&self) -> &Arc<LedgerStore> {
        &self.ledger
    }

    pub fn payouts(&self) -> &Arc<PayoutStore> {
        &self.payouts
    }

    pub fn directory(&self) -> &Arc<DirectoryStore> {
        &self.directory
    }

    /// Execute an internal peer-to-peer transfer.
    ///
    /// Settlement is synchronous: either both ledger legs commit and one
    /// COMPLETED record is written, or nothing changes. If the receiver
    /// credit fails after the sender debit landed, the debit is compensated
    /// before the failure is reported.
    pub fn execute_internal_transfer(
        &self,
        sender_account: AccountId,
        receiver_account_number: &str,
        amount: u64,
        description: Option<&str>,
    ) -> Result<PayoutRecord, TransferError> {
        if amount == 0 {
            return Err(TransferError::InvalidAmount);
        }

        let sender_org = self
            .directory
            .get_org_by_account(sender_account)
            .ok_or(TransferError::AccountNotFound)?;

        // Compliance gate: mandatory before any outbound movement.
        if sender_org.compliance != ComplianceStatus::Verified {
            return Err(TransferError::NotVerified);
        }

        let receiver_org = self
            .directory
            .resolve_account_number(receiver_account_number)
            .ok_or(TransferError::ReceiverNotFound)?;

        if receiver_org.account_id == sender_account {
            return Err(TransferError::SelfTransfer);
        }

        // Allocate the record id up front so both legs and any compensation
        // carry idempotency keys tied to this movement.
        let payout_id = PayoutId::new();

        let delta = to_delta(amount)?;
        self.ledger.adjust(
            sender_account,
            -delta,
            Some(&format!("debit:{payout_id}")),
        )?;

        if let Err(credit_err) = self.ledger.adjust(
            receiver_org.account_id,
            delta,
            Some(&format!("credit:{payout_id}")),
        ) {
            // Receiver leg failed after the sender debit landed: compensate.
            warn!(
                %payout_id,
                sender_account,
                receiver_account = receiver_org.account_id,
                error = %credit_err,
                "receiver credit failed, compensating sender debit"
            );
            if let Err(comp_err) = self.ledger.adjust(
                sender_account,
                delta,
                Some(&format!("compensate:{payout_id}")),
            ) {
                // Funds are in-flight; this needs operator attention.
                error!(
                    %payout_id,
                    sender_account,
                    error = %comp_err,
                    "COMPENSATION FAILED - sender debit not restored"
                );
            }
            return Err(credit_err.into());
        }

        let record = PayoutRecord::with_id(
            payout_id,
            PayoutKind::Internal {
                sender: sender_account,
                receiver: receiver_org.account_id,
            },
            amount,
            "USD",
            PayoutStatus::Completed,
            Some(
                description
                    .unwrap_or("Internal Transfer")
                    .to_string(),
            ),
        );
        self.payouts.insert(record.clone());

        info!(
            %payout_id,
            sender_account,
            receiver_account = receiver_org.account_id,
            amount,
            "internal transfer completed"
        );
        Ok(record)
    }

    /// Initiate an external payout to a registered beneficiary.
    ///
    /// Side effects are strictly ordered: provider call first, then the
    /// ledger debit, then the PENDING record - a provider failure never
    /// leaves a debited, unrecorded balance. Completion arrives later
    /// through the reconciler; the provider's initial status is advisory.
    pub async fn initiate_external_payout(
        &self,
        org_id: OrgId,
        beneficiary_id: BeneficiaryId,
        amount: u64,
        currency: &str,
        description: Option<&str>,
    ) -> Result<PayoutRecord, TransferError> {
        if amount == 0 {
            return Err(TransferError::InvalidAmount);
        }
        money::currency_decimals(currency)
            .map_err(|_| TransferError::UnknownCurrency(currency.to_string()))?;

        let org = self
            .directory
            .get_org(org_id)
            .ok_or(TransferError::OrganizationNotFound)?;

        let beneficiary = self
            .directory
            .get_beneficiary(beneficiary_id)
            .filter(|b| b.org_id == org_id)
            .ok_or(TransferError::BeneficiaryNotFound)?;

        let provider_beneficiary_id = beneficiary
            .provider_id
            .as_deref()
            .ok_or(TransferError::BeneficiaryNotRegistered)?;

        // 1. Provider first.
        let order = self
            .provider
            .create_payout(provider_beneficiary_id, amount, currency, description)
            .await?;

        // 2. Debit the organization account.
        let delta = to_delta(amount)?;
        if let Err(debit_err) = self.ledger.adjust(
            org.account_id,
            -delta,
            Some(&format!("payout:{}", order.external_id)),
        ) {
            // The provider order exists but was never funded or recorded
            // locally; its initial status is advisory, nothing to repair.
            warn!(
                org_id,
                external_id = %order.external_id,
                error = %debit_err,
                "payout debit failed after provider call, order left unfunded"
            );
            return Err(debit_err.into());
        }

        // 3. Record PENDING, carrying the external id for reconciliation.
        let record = PayoutRecord::new(
            PayoutKind::External {
                organization: org_id,
                beneficiary: beneficiary_id,
                external_id: order.external_id.clone(),
            },
            amount,
            currency,
            PayoutStatus::Pending,
            description.map(str::to_string),
        );
        self.payouts.insert(record.clone());

        info!(
            payout_id = %record.payout_id,
            org_id,
            beneficiary_id,
            external_id = %order.external_id,
            amount,
            initial_status = %order.initial_status,
            "external payout initiated"
        );
        Ok(record)
    }

    /// Register a beneficiary: provider registration first, then local
    /// persistence. Account details are immutable after this call.
    pub async fn register_beneficiary(
        &self,
        org_id: OrgId,
        name: &str,
        email: Option<&str>,
        currency: &str,
        account_details: serde_json::Value,
    ) -> Result<Beneficiary, TransferError> {
        money::currency_decimals(currency)
            .map_err(|_| TransferError::UnknownCurrency(currency.to_string()))?;
        self.directory
            .get_org(org_id)
            .ok_or(TransferError::OrganizationNotFound)?;

        let registered = self
            .provider
            .create_beneficiary(&BeneficiaryRequest {
                name: name.to_string(),
                email: email.map(str::to_string),
                currency: currency.to_string(),
                account_details: account_details.clone(),
            })
            .await?;

        let beneficiary = self.directory.insert_beneficiary(
            org_id,
            name,
            email,
            currency,
            &account_details.to_string(),
            Some(registered.external_id),
        );

        info!(
            org_id,
            beneficiary_id = beneficiary.beneficiary_id,
            provider_id = ?beneficiary.provider_id,
            "beneficiary registered"
        );
        Ok(beneficiary)
    }

    /// Rename a beneficiary. Payment-routing data cannot be edited in place.
    pub fn rename_beneficiary(
        &self,
        org_id: OrgId,
        beneficiary_id: BeneficiaryId,
        name: &str,
    ) -> Result<Beneficiary, TransferError> {
        self.directory
            .rename_beneficiary(org_id, beneficiary_id, name)
            .ok_or(TransferError::BeneficiaryNotFound)
    }

    /// Credit a wallet top-up and write a COMPLETED deposit record.
    pub fn deposit(
        &self,
        account_id: AccountId,
        amount: u64,
        description: Option<&str>,
    ) -> Result<(PayoutRecord, u64), TransferError> {
        if amount == 0 {
            return Err(TransferError::InvalidAmount);
        }

        let payout_id = PayoutId::new();
        let new_balance = self.ledger.adjust(
            account_id,
            to_delta(amount)?,
            Some(&format!("deposit:{payout_id}")),
        )?;

        let record = PayoutRecord::with_id(
            payout_id,
            PayoutKind::Deposit {
                account: account_id,
            },
            amount,
            "USD",
            PayoutStatus::Completed,
            Some(description.unwrap_or("Wallet Deposit").to_string()),
        );
        self.payouts.insert(record.clone());

        info!(%payout_id, account_id, amount, new_balance, "deposit applied");
        Ok((record, new_balance))
    }
}

/// Amounts are u64 minor units but the ledger signs deltas as i64.
fn to_delta(amount: u64) -> Result<i64, TransferError> {
    i64::try_from(amount).map_err(|_| TransferError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ProviderBeneficiary, ProviderError, ProviderOrder};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Provider stub with a switchable failure mode.
    #[derive(Default)]
    struct StubProvider {
        fail_payouts: AtomicBool,
    }

    #[async_trait]
    impl PayoutProvider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn create_beneficiary(
            &self,
            _req: &BeneficiaryRequest,
        ) -> Result<ProviderBeneficiary, ProviderError> {
            Ok(ProviderBeneficiary {
                external_id: "ben_stub".to_string(),
            })
        }

        async fn create_payout(
            &self,
            _external_beneficiary_id: &str,
            _amount_minor: u64,
            _currency: &str,
            _description: Option<&str>,
        ) -> Result<ProviderOrder, ProviderError> {
            if self.fail_payouts.load(Ordering::Relaxed) {
                return Err(ProviderError::Rejected("stub outage".to_string()));
            }
            Ok(ProviderOrder {
                external_id: format!("ord_{}", ulid::Ulid::new()),
                initial_status: PayoutStatus::Pending,
            })
        }
    }

    struct Fixture {
        engine: TransferEngine,
        sender: AccountId,
        receiver_number: String,
        receiver_account: AccountId,
        provider: Arc<StubProvider>,
    }

    fn fixture() -> Fixture {
        let ledger = Arc::new(LedgerStore::new());
        let payouts = Arc::new(PayoutStore::new());
        let directory = Arc::new(DirectoryStore::new());
        let provider = Arc::new(StubProvider::default());

        let sender_org = directory
            .create_organization("Sender Co", "ACC-S", ComplianceStatus::Verified)
            .unwrap();
        let receiver_org = directory
            .create_organization("Receiver Co", "ACC-R", ComplianceStatus::Verified)
            .unwrap();
        ledger.open_account(sender_org.account_id);
        ledger.open_account(receiver_org.account_id);
        ledger.adjust(sender_org.account_id, 1000, None).unwrap();

        Fixture {
            engine: TransferEngine::new(ledger, payouts, directory, provider.clone()),
            sender: sender_org.account_id,
            receiver_number: "ACC-R".to_string(),
            receiver_account: receiver_org.account_id,
            provider,
        }
    }

    #[test]
    fn test_internal_transfer_moves_both_legs() {
        let f = fixture();

        let record = f
            .engine
            .execute_internal_transfer(f.sender, &f.receiver_number, 100, Some("invoice 42"))
            .unwrap();

        assert_eq!(record.status, PayoutStatus::Completed);
        assert!(matches!(
            record.kind,
            PayoutKind::Internal { sender, receiver }
                if sender == f.sender && receiver == f.receiver_account
        ));
        assert_eq!(f.engine.ledger().balance_of(f.sender).unwrap(), 900);
        assert_eq!(
            f.engine.ledger().balance_of(f.receiver_account).unwrap(),
            100
        );
    }

    #[test]
    fn test_internal_transfer_insufficient_funds_changes_nothing() {
        let f = fixture();

        let err = f
            .engine
            .execute_internal_transfer(f.sender, &f.receiver_number, 5000, None)
            .unwrap_err();
        assert!(matches!(err, TransferError::InsufficientFunds));
        assert_eq!(f.engine.ledger().balance_of(f.sender).unwrap(), 1000);
        assert_eq!(f.engine.ledger().balance_of(f.receiver_account).unwrap(), 0);
        assert!(f.engine.payouts().list_for_account(f.sender).is_empty());
    }

    #[test]
    fn test_internal_transfer_validations() {
        let f = fixture();

        assert!(matches!(
            f.engine.execute_internal_transfer(f.sender, "ACC-R", 0, None),
            Err(TransferError::InvalidAmount)
        ));
        assert!(matches!(
            f.engine
                .execute_internal_transfer(f.sender, "ACC-NOPE", 100, None),
            Err(TransferError::ReceiverNotFound)
        ));
        assert!(matches!(
            f.engine
                .execute_internal_transfer(f.sender, "ACC-S", 100, None),
            Err(TransferError::SelfTransfer)
        ));
    }

    #[test]
    fn test_unverified_sender_blocked() {
        let f = fixture();
        let sender_org = f.engine.directory().get_org_by_account(f.sender).unwrap();
        f.engine
            .directory()
            .set_compliance(sender_org.org_id, ComplianceStatus::Pending);

        assert!(matches!(
            f.engine
                .execute_internal_transfer(f.sender, &f.receiver_number, 100, None),
            Err(TransferError::NotVerified)
        ));
        assert_eq!(f.engine.ledger().balance_of(f.sender).unwrap(), 1000);
    }

    #[test]
    fn test_compensation_restores_sender_when_credit_fails() {
        let f = fixture();
        // Force the receiver credit to fail: its ledger account disappears
        // from under the transfer. The directory entry stays so routing
        // still resolves.
        let ledger = Arc::new(LedgerStore::new());
        ledger.open_account(f.sender);
        ledger.adjust(f.sender, 1000, None).unwrap();
        let engine = TransferEngine::new(
            ledger,
            Arc::new(PayoutStore::new()),
            f.engine.directory().clone(),
            f.provider.clone(),
        );

        let err = engine
            .execute_internal_transfer(f.sender, &f.receiver_number, 100, None)
            .unwrap_err();
        assert!(matches!(err, TransferError::AccountNotFound));
        // Debit was compensated
        assert_eq!(engine.ledger().balance_of(f.sender).unwrap(), 1000);
        assert!(engine.payouts().list_for_account(f.sender).is_empty());
    }

    #[tokio::test]
    async fn test_external_payout_debits_and_records_pending() {
        let f = fixture();
        let org = f.engine.directory().get_org_by_account(f.sender).unwrap();
        let ben = f
            .engine
            .register_beneficiary(org.org_id, "Supplier", None, "USD", serde_json::json!({}))
            .await
            .unwrap();

        let record = f
            .engine
            .initiate_external_payout(org.org_id, ben.beneficiary_id, 100, "USD", None)
            .await
            .unwrap();

        assert_eq!(record.status, PayoutStatus::Pending);
        assert!(record.external_id().unwrap().starts_with("ord_"));
        assert_eq!(f.engine.ledger().balance_of(f.sender).unwrap(), 900);
    }

    #[tokio::test]
    async fn test_external_payout_provider_failure_precedes_debit() {
        let f = fixture();
        let org = f.engine.directory().get_org_by_account(f.sender).unwrap();
        let ben = f
            .engine
            .register_beneficiary(org.org_id, "Supplier", None, "USD", serde_json::json!({}))
            .await
            .unwrap();

        f.provider.fail_payouts.store(true, Ordering::Relaxed);
        let err = f
            .engine
            .initiate_external_payout(org.org_id, ben.beneficiary_id, 100, "USD", None)
            .await
            .unwrap_err();

        assert!(matches!(err, TransferError::Provider(_)));
        // Provider failed before any balance mutation
        assert_eq!(f.engine.ledger().balance_of(f.sender).unwrap(), 1000);
    }

    #[tokio::test]
    async fn test_external_payout_insufficient_funds() {
        let f = fixture();
        let org = f.engine.directory().get_org_by_account(f.sender).unwrap();
        let ben = f
            .engine
            .register_beneficiary(org.org_id, "Supplier", None, "USD", serde_json::json!({}))
            .await
            .unwrap();

        let err = f
            .engine
            .initiate_external_payout(org.org_id, ben.beneficiary_id, 5000, "USD", None)
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::InsufficientFunds));
        assert_eq!(f.engine.ledger().balance_of(f.sender).unwrap(), 1000);
        // No dangling local record
        assert!(f.engine.payouts().list_for_account(f.sender).is_empty());
    }

    #[tokio::test]
    async fn test_beneficiary_of_other_org_is_not_found() {
        let f = fixture();
        let sender_org = f.engine.directory().get_org_by_account(f.sender).unwrap();
        let other_org = f
            .engine
            .directory()
            .get_org_by_account(f.receiver_account)
            .unwrap();
        let foreign_ben = f
            .engine
            .register_beneficiary(
                other_org.org_id,
                "Their supplier",
                None,
                "USD",
                serde_json::json!({}),
            )
            .await
            .unwrap();

        let err = f
            .engine
            .initiate_external_payout(
                sender_org.org_id,
                foreign_ben.beneficiary_id,
                100,
                "USD",
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::BeneficiaryNotFound));
    }

    #[test]
    fn test_deposit_credits_and_records() {
        let f = fixture();

        let (record, new_balance) = f.engine.deposit(f.sender, 250, None).unwrap();
        assert_eq!(new_balance, 1250);
        assert_eq!(record.status, PayoutStatus::Completed);
        assert!(matches!(
            record.kind,
            PayoutKind::Deposit { account } if account == f.sender
        ));
        assert_eq!(record.description.as_deref(), Some("Wallet Deposit"));
    }
}
