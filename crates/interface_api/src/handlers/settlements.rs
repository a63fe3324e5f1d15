//! Settlement handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use core_kernel::SettlementId;
use domain_settlement::SettlementDraft;

use crate::dto::settlements::*;
use crate::{error::ApiError, AppState};

/// Calculates a breakdown without storing anything
pub async fn calculate(
    State(state): State<AppState>,
    Json(request): Json<SettlementRequest>,
) -> Result<Json<CalculationResponse>, ApiError> {
    let draft = SettlementDraft::try_from(request)?;
    let assessment = state.service.preview(draft)?;
    Ok(Json(CalculationResponse::from(&assessment)))
}

/// Creates a settlement and stores its breakdown
pub async fn create_settlement(
    State(state): State<AppState>,
    Json(request): Json<SettlementRequest>,
) -> Result<(StatusCode, Json<SettlementResponse>), ApiError> {
    let draft = SettlementDraft::try_from(request)?;
    let record = state.service.create(draft).await?;
    Ok((StatusCode::CREATED, Json(SettlementResponse::from(&record))))
}

/// Lists stored settlements, oldest first
pub async fn list_settlements(
    State(state): State<AppState>,
) -> Result<Json<Vec<SettlementResponse>>, ApiError> {
    let records = state.service.list().await?;
    Ok(Json(records.iter().map(SettlementResponse::from).collect()))
}

/// Gets a settlement by ID
pub async fn get_settlement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SettlementResponse>, ApiError> {
    let record = state.service.get(parse_id(&id)?).await?;
    Ok(Json(SettlementResponse::from(&record)))
}

/// Replaces a settlement's inputs and recalculates its breakdown
pub async fn update_settlement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SettlementRequest>,
) -> Result<Json<SettlementResponse>, ApiError> {
    let id = parse_id(&id)?;
    let draft = SettlementDraft::try_from(request)?;
    let record = state.service.update(id, draft).await?;
    Ok(Json(SettlementResponse::from(&record)))
}

/// Deletes a settlement, returning what was removed
pub async fn delete_settlement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SettlementResponse>, ApiError> {
    let record = state.service.delete(parse_id(&id)?).await?;
    Ok(Json(SettlementResponse::from(&record)))
}

/// Accepts both `STL-<uuid>` and a bare UUID
fn parse_id(raw: &str) -> Result<SettlementId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid settlement id '{raw}'")))
}
