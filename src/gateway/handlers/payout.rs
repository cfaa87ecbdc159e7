//! External payout handlers

use axum::{Json, extract::State, http::HeaderMap};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, PayoutRequest, ok};
use super::helpers::{parse_money, principal};
use crate::engine::TransferError;
use crate::payout::PayoutRecord;

/// POST /api/v1/payouts
///
/// Initiates an external payout to one of the caller's registered
/// beneficiaries. Returns the PENDING record; settlement arrives later via
/// webhook.
pub async fn create_payout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PayoutRequest>,
) -> ApiResult<PayoutRecord> {
    let account_id = principal(&headers)?;
    let org = state
        .engine
        .directory()
        .get_org_by_account(account_id)
        .ok_or_else(|| ApiError::from(TransferError::AccountNotFound))?;
    let amount = parse_money(&req.amount, &req.currency)?;

    let record = state
        .engine
        .initiate_external_payout(
            org.org_id,
            req.beneficiary_id,
            amount,
            &req.currency,
            req.description.as_deref(),
        )
        .await?;
    ok(record)
}

/// GET /api/v1/payouts
///
/// All movement records visible to the caller, newest first.
pub async fn list_payouts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<PayoutRecord>> {
    let account_id = principal(&headers)?;
    ok(state.engine.payouts().list_for_account(account_id))
}
