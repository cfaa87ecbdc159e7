//! External Payout Provider
//!
//! Opaque collaborator that registers beneficiaries and initiates payouts.
//! Its initial payout status is advisory only: actual settlement arrives
//! later through the webhook reconciler, possibly delayed, duplicated, or
//! out of order.

mod http;
#[cfg(feature = "mock-provider")]
mod sandbox;

pub use http::HttpProvider;
#[cfg(feature = "mock-provider")]
pub use sandbox::SandboxProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::payout::PayoutStatus;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    Request(String),

    #[error("Provider returned malformed response: {0}")]
    MalformedResponse(String),

    #[error("Provider rejected the request: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Request(e.to_string())
    }
}

/// Beneficiary registration request payload.
#[derive(Debug, Clone, Serialize)]
pub struct BeneficiaryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub currency: String,
    /// Opaque account-detail payload, forwarded verbatim.
    pub account_details: serde_json::Value,
}

/// Provider-side beneficiary handle.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderBeneficiary {
    #[serde(rename = "id")]
    pub external_id: String,
}

/// Provider-side payout order: external id plus an advisory initial status.
#[derive(Debug, Clone)]
pub struct ProviderOrder {
    pub external_id: String,
    pub initial_status: PayoutStatus,
}

/// External payout provider contract.
#[async_trait]
pub trait PayoutProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Register a beneficiary and return its provider-side id.
    async fn create_beneficiary(
        &self,
        req: &BeneficiaryRequest,
    ) -> Result<ProviderBeneficiary, ProviderError>;

    /// Initiate a payout to a previously registered beneficiary.
    ///
    /// `amount_minor` is in currency minor units. The returned status is
    /// advisory; completion is signaled via webhook.
    async fn create_payout(
        &self,
        external_beneficiary_id: &str,
        amount_minor: u64,
        currency: &str,
        description: Option<&str>,
    ) -> Result<ProviderOrder, ProviderError>;
}
