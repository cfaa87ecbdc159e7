//! Provider webhook handler
//!
//! The provider fires-and-forgets: structurally valid payloads are always
//! acknowledged with 200 so the provider never retries a signal we chose to
//! ignore. Only signature failures (401) and malformed bodies (400) are
//! surfaced as errors.

use axum::{body::Bytes, extract::State, http::HeaderMap};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{info, warn};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, WebhookAck, WebhookEvent, ok};
use crate::payout::PayoutStatus;
use crate::reconciler::ReconcileOutcome;

type HmacSha256 = Hmac<Sha256>;

/// Verify the lowercase-hex HMAC-SHA256 of the raw body against the
/// `x-webhook-signature` header.
fn verify_signature(secret: &str, headers: &HeaderMap, body: &[u8]) -> Result<(), ApiError> {
    let signature = headers
        .get("x-webhook-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing webhook signature"))?;

    let raw = hex::decode(signature)
        .map_err(|_| ApiError::unauthorized("Malformed webhook signature"))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| ApiError::unauthorized("Webhook secret rejected"))?;
    mac.update(body);
    mac.verify_slice(&raw)
        .map_err(|_| ApiError::unauthorized("Webhook signature mismatch"))
}

/// POST /api/v1/webhooks
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<WebhookAck> {
    // Signature is checked over the raw bytes, before any parsing.
    if let Some(secret) = &state.webhook_secret {
        verify_signature(secret, &headers, &body)?;
    }

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Malformed webhook payload: {e}")))?;

    if event.event_type != "payout.updated" && event.event_type != "order.updated" {
        info!(event_type = %event.event_type, "unhandled webhook event type acknowledged");
        return ok(WebhookAck {
            received: true,
            outcome: "IGNORED".to_string(),
        });
    }

    let status: PayoutStatus = event
        .data
        .status
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Unknown status: {}", event.data.status)))?;

    let outcome =
        state
            .reconciler
            .apply_external_status(&event.data.id, status, event.data.timestamp);

    if outcome == ReconcileOutcome::Unknown {
        warn!(external_id = %event.data.id, "webhook for unknown external id acknowledged");
    }

    ok(WebhookAck {
        received: true,
        outcome: format!("{outcome:?}").to_uppercase(),
    })
}
