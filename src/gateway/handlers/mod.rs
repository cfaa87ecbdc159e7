//! HTTP handlers, one module per concern.

mod account;
mod beneficiary;
mod health;
mod helpers;
mod payout;
#[cfg(feature = "mock-api")]
mod simulate;
mod transfer;
mod webhook;

pub use account::{create_deposit, get_balance, get_reconciliation};
pub use beneficiary::{create_beneficiary, list_beneficiaries, rename_beneficiary};
pub use health::health_check;
pub use payout::{create_payout, list_payouts};
#[cfg(feature = "mock-api")]
pub use simulate::simulate_callback;
pub use transfer::create_transfer;
pub use webhook::handle_webhook;
