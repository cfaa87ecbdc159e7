//! Payout records: status machine, record shape, and store.

mod record;
mod status;
mod store;

pub use record::{PayoutKind, PayoutRecord};
pub use status::PayoutStatus;
pub use store::PayoutStore;
