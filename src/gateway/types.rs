//! API request/response types and error codes
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `error_codes`: Standard error code constants
//! - Request DTOs (amounts arrive as decimal strings, never floats)

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::engine::TransferError;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Standard API error codes
pub mod error_codes {
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_FUNDS: i32 = 1002;
    pub const SELF_TRANSFER: i32 = 1003;
    pub const NOT_VERIFIED: i32 = 1004;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const AUTH_FAILED: i32 = 2002;

    // Resource errors (4xxx)
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4091;

    // Server / upstream errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const PROVIDER_ERROR: i32 = 5002;
}

// ============================================================================
// API error type
// ============================================================================

/// Handler error: HTTP status plus the unified error body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Shorthand for a success response.
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            error_codes::INVALID_PARAMETER,
            msg,
        )
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error_codes::AUTH_FAILED, msg)
    }

    pub fn missing_auth() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            error_codes::MISSING_AUTH,
            "Missing or invalid x-account-id header",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::error(self.code, self.msg));
        (self.status, body).into_response()
    }
}

impl From<TransferError> for ApiError {
    fn from(e: TransferError) -> Self {
        let status =
            StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = match &e {
            TransferError::InvalidAmount
            | TransferError::UnknownCurrency(_)
            | TransferError::BeneficiaryNotRegistered => error_codes::INVALID_PARAMETER,
            TransferError::SelfTransfer => error_codes::SELF_TRANSFER,
            TransferError::NotVerified => error_codes::NOT_VERIFIED,
            TransferError::AccountNotFound
            | TransferError::ReceiverNotFound
            | TransferError::OrganizationNotFound
            | TransferError::BeneficiaryNotFound => error_codes::NOT_FOUND,
            TransferError::InsufficientFunds => error_codes::INSUFFICIENT_FUNDS,
            TransferError::Conflict | TransferError::Overflow => error_codes::CONFLICT,
            TransferError::Provider(_) => error_codes::PROVIDER_ERROR,
        };
        Self::new(status, code, e.to_string())
    }
}

impl From<crate::ledger::LedgerError> for ApiError {
    fn from(e: crate::ledger::LedgerError) -> Self {
        TransferError::from(e).into()
    }
}

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Receiver routing account number.
    pub to_account_number: String,
    /// Decimal string, e.g. "100.00".
    pub amount: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PayoutRequest {
    pub beneficiary_id: u64,
    pub amount: String,
    pub currency: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub amount: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBeneficiaryRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub currency: String,
    /// Opaque payment-routing details, forwarded to the provider verbatim.
    pub account_details: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct RenameBeneficiaryRequest {
    pub name: String,
}

/// Provider callback envelope.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEventData {
    /// Provider-side order id.
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BalanceResponseData {
    pub account_id: u64,
    /// Minor units.
    pub balance: u64,
    /// Display string, e.g. "900.00".
    pub display: String,
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    pub outcome: String,
}
