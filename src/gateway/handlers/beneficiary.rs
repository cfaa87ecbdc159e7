//! Beneficiary management handlers

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, CreateBeneficiaryRequest, RenameBeneficiaryRequest, ok};
use super::helpers::principal;
use crate::directory::Beneficiary;
use crate::engine::TransferError;

fn caller_org(state: &AppState, headers: &HeaderMap) -> Result<crate::directory::Organization, ApiError> {
    let account_id = principal(headers)?;
    state
        .engine
        .directory()
        .get_org_by_account(account_id)
        .ok_or_else(|| ApiError::from(TransferError::AccountNotFound))
}

/// POST /api/v1/beneficiaries
pub async fn create_beneficiary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateBeneficiaryRequest>,
) -> ApiResult<Beneficiary> {
    let org = caller_org(&state, &headers)?;
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Beneficiary name must not be empty"));
    }

    let beneficiary = state
        .engine
        .register_beneficiary(
            org.org_id,
            &req.name,
            req.email.as_deref(),
            &req.currency,
            req.account_details,
        )
        .await?;
    ok(beneficiary)
}

/// GET /api/v1/beneficiaries
pub async fn list_beneficiaries(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<Beneficiary>> {
    let org = caller_org(&state, &headers)?;
    ok(state.engine.directory().list_beneficiaries(org.org_id))
}

/// PUT /api/v1/beneficiaries/{id}
///
/// Rename only. Payment-routing details are immutable after registration.
pub async fn rename_beneficiary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(beneficiary_id): Path<u64>,
    Json(req): Json<RenameBeneficiaryRequest>,
) -> ApiResult<Beneficiary> {
    let org = caller_org(&state, &headers)?;
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Beneficiary name must not be empty"));
    }

    let beneficiary = state
        .engine
        .rename_beneficiary(org.org_id, beneficiary_id, &req.name)?;
    ok(beneficiary)
}
