//! Internal transfer handler

use axum::{Json, extract::State, http::HeaderMap};

use super::super::state::AppState;
use super::super::types::{ApiResult, TransferRequest, ok};
use super::helpers::{parse_money, principal};
use crate::payout::PayoutRecord;

/// POST /api/v1/transfers
///
/// Moves money from the caller's account to another organization's account,
/// settling synchronously. Internal transfers are USD-denominated.
pub async fn create_transfer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<TransferRequest>,
) -> ApiResult<PayoutRecord> {
    let sender = principal(&headers)?;
    let amount = parse_money(&req.amount, "USD")?;

    let record = state.engine.execute_internal_transfer(
        sender,
        &req.to_account_number,
        amount,
        req.description.as_deref(),
    )?;
    ok(record)
}
