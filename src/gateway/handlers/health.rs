//! Health check handler

use axum::Json;
use serde_json::{Value, json};

use super::super::types::ApiResponse;

/// GET /api/v1/health
pub async fn health_check() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
