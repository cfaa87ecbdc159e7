//! Organization / beneficiary directory.

mod models;
mod store;

pub use models::{Beneficiary, ComplianceStatus, Organization};
pub use store::DirectoryStore;
