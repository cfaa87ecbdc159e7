//! Ledger Store
//!
//! Owns per-account balances and their atomic mutation. See [`store::LedgerStore`].

mod balance;
mod error;
mod store;

pub use balance::AccountBalance;
pub use error::LedgerError;
pub use store::LedgerStore;
