//! Shared handler helpers: principal extraction and money parsing.

use axum::http::HeaderMap;

use super::super::types::ApiError;
use crate::core_types::AccountId;
use crate::money;

/// The authenticated principal's ledger account, taken from the
/// `x-account-id` header. Identity is established upstream; the core
/// trusts the header unconditionally.
pub fn principal(headers: &HeaderMap) -> Result<AccountId, ApiError> {
    headers
        .get("x-account-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<AccountId>().ok())
        .ok_or_else(ApiError::missing_auth)
}

/// Parse a decimal-string amount into minor units for `currency`.
pub fn parse_money(amount: &str, currency: &str) -> Result<u64, ApiError> {
    let decimals = money::currency_decimals(currency)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    money::parse_amount(amount, decimals).map_err(|e| ApiError::bad_request(e.to_string()))
}
