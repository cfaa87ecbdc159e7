//! Sandbox payout provider.
//!
//! Stands in for the real provider in demos and tests: fabricates ids and
//! always reports PENDING. No timers here - settlement signals are injected
//! through the reconciler (webhook or the mock-api route), never simulated
//! inside the provider.

use async_trait::async_trait;
use tracing::info;

use super::{
    BeneficiaryRequest, PayoutProvider, ProviderBeneficiary, ProviderError, ProviderOrder,
};
use crate::payout::PayoutStatus;

#[derive(Default)]
pub struct SandboxProvider;

impl SandboxProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PayoutProvider for SandboxProvider {
    fn name(&self) -> &'static str {
        "sandbox"
    }

    async fn create_beneficiary(
        &self,
        req: &BeneficiaryRequest,
    ) -> Result<ProviderBeneficiary, ProviderError> {
        let external_id = format!("ben_{}", ulid::Ulid::new());
        info!(name = %req.name, external_id = %external_id, "sandbox beneficiary registered");
        Ok(ProviderBeneficiary { external_id })
    }

    async fn create_payout(
        &self,
        external_beneficiary_id: &str,
        amount_minor: u64,
        currency: &str,
        _description: Option<&str>,
    ) -> Result<ProviderOrder, ProviderError> {
        let external_id = format!("ord_{}", ulid::Ulid::new());
        info!(
            beneficiary = external_beneficiary_id,
            amount_minor,
            currency,
            external_id = %external_id,
            "sandbox payout order created"
        );
        Ok(ProviderOrder {
            external_id,
            initial_status: PayoutStatus::Pending,
        })
    }
}
