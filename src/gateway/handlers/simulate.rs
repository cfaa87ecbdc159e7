//! Mock callback injection - only compiled with the `mock-api` feature.
//!
//! Demo/test replacement for real provider callbacks: feeds the reconciler
//! directly, skipping signature verification.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, ok};
use crate::payout::PayoutStatus;

#[derive(Debug, Deserialize)]
pub struct SimulateCallbackRequest {
    pub external_id: String,
    pub status: String,
}

/// POST /api/v1/internal/simulate_callback
pub async fn simulate_callback(
    State(state): State<AppState>,
    Json(req): Json<SimulateCallbackRequest>,
) -> ApiResult<Value> {
    let status: PayoutStatus = req
        .status
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Unknown status: {}", req.status)))?;

    info!(external_id = %req.external_id, status = %status, "simulated provider callback");
    let outcome = state
        .reconciler
        .apply_external_status(&req.external_id, status, None);

    ok(json!({ "outcome": format!("{outcome:?}").to_uppercase() }))
}
