//! HTTP payout provider client.
//!
//! JSON REST client authenticated with api-key/api-secret headers. The
//! provider exposes `/beneficiaries` for registration and `/orders` for
//! payout initiation; webhooks deliver subsequent status updates.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{
    BeneficiaryRequest, PayoutProvider, ProviderBeneficiary, ProviderError, ProviderOrder,
};
use crate::config::ProviderConfig;
use crate::money;
use crate::payout::PayoutStatus;

pub struct HttpProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    status: String,
}

impl HttpProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &config.api_key {
            headers.insert(
                "x-api-key",
                HeaderValue::from_str(key)
                    .map_err(|e| ProviderError::Request(e.to_string()))?,
            );
        }
        if let Some(secret) = &config.api_secret {
            headers.insert(
                "x-api-secret",
                HeaderValue::from_str(secret)
                    .map_err(|e| ProviderError::Request(e.to_string()))?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PayoutProvider for HttpProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn create_beneficiary(
        &self,
        req: &BeneficiaryRequest,
    ) -> Result<ProviderBeneficiary, ProviderError> {
        let url = format!("{}/beneficiaries", self.base_url);
        debug!(url = %url, name = %req.name, "registering beneficiary with provider");

        let response = self.client.post(&url).json(req).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "provider rejected beneficiary registration");
            return Err(ProviderError::Rejected(format!("{status}: {body}")));
        }

        response
            .json::<ProviderBeneficiary>()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }

    async fn create_payout(
        &self,
        external_beneficiary_id: &str,
        amount_minor: u64,
        currency: &str,
        description: Option<&str>,
    ) -> Result<ProviderOrder, ProviderError> {
        let url = format!("{}/orders", self.base_url);
        let decimals = money::currency_decimals(currency)
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let body = serde_json::json!({
            "beneficiaryId": external_beneficiary_id,
            "amount": money::format_amount(amount_minor, decimals),
            "currency": currency,
            "description": description,
        });
        debug!(url = %url, beneficiary = external_beneficiary_id, "initiating payout with provider");

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(%status, "provider rejected payout order");
            return Err(ProviderError::Rejected(format!("{status}: {text}")));
        }

        let order: OrderResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        // Unknown initial statuses degrade to PENDING: the webhook stream is
        // the source of truth either way.
        let initial_status = order.status.parse().unwrap_or(PayoutStatus::Pending);

        Ok(ProviderOrder {
            external_id: order.id,
            initial_status,
        })
    }
}
