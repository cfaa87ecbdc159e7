//! Transfer Engine: orchestration of money movements over the ledger,
//! directory, payout store and provider adapter.

mod error;
mod report;
mod transfer;

pub use error::TransferError;
pub use report::{EntryDirection, ReconciliationEntry};
pub use transfer::TransferEngine;
