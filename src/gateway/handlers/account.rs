//! Account handlers: deposits, balance query, reconciliation report.

use axum::{Json, extract::State, http::HeaderMap};

use super::super::state::AppState;
use super::super::types::{ApiResult, BalanceResponseData, DepositRequest, ok};
use super::helpers::{parse_money, principal};
use crate::engine::ReconciliationEntry;
use crate::money;
use crate::payout::PayoutRecord;

/// POST /api/v1/deposits
pub async fn create_deposit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<DepositRequest>,
) -> ApiResult<PayoutRecord> {
    let account_id = principal(&headers)?;
    let amount = parse_money(&req.amount, "USD")?;

    let (record, _new_balance) =
        state
            .engine
            .deposit(account_id, amount, req.description.as_deref())?;
    ok(record)
}

/// GET /api/v1/balance
pub async fn get_balance(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<BalanceResponseData> {
    let account_id = principal(&headers)?;
    let balance = state.engine.ledger().balance_of(account_id)?;
    ok(BalanceResponseData {
        account_id,
        balance,
        display: money::format_amount(balance, 2),
        currency: "USD".to_string(),
    })
}

/// GET /api/v1/reconciliation
pub async fn get_reconciliation(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<ReconciliationEntry>> {
    let account_id = principal(&headers)?;
    ok(state.engine.reconciliation_report(account_id))
}
