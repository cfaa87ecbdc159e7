use thiserror::Error;

use crate::core_types::AccountId;

/// Ledger Store error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Insufficient funds on account {account_id}: requested {requested}, available {available}")]
    InsufficientFunds {
        account_id: AccountId,
        requested: u64,
        available: u64,
    },

    #[error("Conditional update retries exhausted on account {0}")]
    Conflict(AccountId),

    #[error("Balance overflow on account {0}")]
    Overflow(AccountId),
}
