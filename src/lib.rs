//! Payrail - Ledger and Payout Integrity Core
//!
//! In-process settlement core for a B2B payout platform.
//!
//! # Modules
//!
//! - [`core_types`] - Core type definitions (AccountId, PayoutId, etc.)
//! - [`money`] - Minor-unit amount parsing and formatting
//! - [`ledger`] - Ledger Store: versioned balances, atomic idempotent adjust
//! - [`directory`] - Organizations and beneficiaries
//! - [`payout`] - Payout records, status machine, record store
//! - [`engine`] - Transfer Engine: transfers, payouts, deposits, reports
//! - [`reconciler`] - Provider status signal reconciliation
//! - [`provider`] - Payout provider adapter (HTTP + sandbox)
//! - [`gateway`] - axum HTTP surface

// Core types - must be first!
pub mod core_types;

// Money and stores
pub mod directory;
pub mod ledger;
pub mod money;
pub mod payout;

// Orchestration
pub mod engine;
pub mod provider;
pub mod reconciler;

// Service surface
pub mod config;
pub mod gateway;
pub mod logging;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use core_types::{AccountId, BeneficiaryId, OrgId, PayoutId};
pub use directory::{Beneficiary, ComplianceStatus, DirectoryStore, Organization};
pub use engine::{TransferEngine, TransferError};
pub use ledger::{LedgerError, LedgerStore};
pub use payout::{PayoutKind, PayoutRecord, PayoutStatus, PayoutStore};
pub use provider::PayoutProvider;
pub use reconciler::{ReconcileOutcome, Reconciler};
