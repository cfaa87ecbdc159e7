//! Transfer Engine error types.
//!
//! Error codes map 1:1 to API responses; validation failures are recovered
//! at the engine boundary and returned as typed failures.

use thiserror::Error;

use crate::ledger::LedgerError;
use crate::provider::ProviderError;

#[derive(Error, Debug)]
pub enum TransferError {
    // === Validation Errors ===
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Cannot transfer to self")]
    SelfTransfer,

    #[error("Compliance not verified - outbound movement blocked")]
    NotVerified,

    // === Lookup Errors ===
    #[error("Account not found")]
    AccountNotFound,

    #[error("Receiver account not found")]
    ReceiverNotFound,

    #[error("Organization not found")]
    OrganizationNotFound,

    #[error("Beneficiary not found")]
    BeneficiaryNotFound,

    #[error("Beneficiary is not registered with the payout provider")]
    BeneficiaryNotRegistered,

    // === Ledger Errors ===
    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Balance update conflict - retries exhausted")]
    Conflict,

    #[error("Balance overflow")]
    Overflow,

    // === Collaborator Errors ===
    #[error("Payout provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl TransferError {
    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::InvalidAmount => "INVALID_AMOUNT",
            TransferError::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            TransferError::SelfTransfer => "SELF_TRANSFER",
            TransferError::NotVerified => "NOT_VERIFIED",
            TransferError::AccountNotFound => "ACCOUNT_NOT_FOUND",
            TransferError::ReceiverNotFound => "RECEIVER_NOT_FOUND",
            TransferError::OrganizationNotFound => "ORGANIZATION_NOT_FOUND",
            TransferError::BeneficiaryNotFound => "BENEFICIARY_NOT_FOUND",
            TransferError::BeneficiaryNotRegistered => "BENEFICIARY_NOT_REGISTERED",
            TransferError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            TransferError::Conflict => "CONFLICT",
            TransferError::Overflow => "OVERFLOW",
            TransferError::Provider(_) => "PROVIDER_ERROR",
        }
    }

    /// HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::InvalidAmount
            | TransferError::UnknownCurrency(_)
            | TransferError::SelfTransfer => 400,
            TransferError::NotVerified => 403,
            TransferError::AccountNotFound
            | TransferError::ReceiverNotFound
            | TransferError::OrganizationNotFound
            | TransferError::BeneficiaryNotFound => 404,
            TransferError::BeneficiaryNotRegistered
            | TransferError::InsufficientFunds
            | TransferError::Overflow => 422,
            TransferError::Conflict => 409,
            TransferError::Provider(_) => 502,
        }
    }
}

impl From<LedgerError> for TransferError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::AccountNotFound(_) => TransferError::AccountNotFound,
            LedgerError::InsufficientFunds { .. } => TransferError::InsufficientFunds,
            LedgerError::Conflict(_) => TransferError::Conflict,
            LedgerError::Overflow(_) => TransferError::Overflow,
        }
    }
}
