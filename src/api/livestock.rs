use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{
    non_empty, require_farm_id, require_field, validate_count, validate_public_id,
};
use super::{ApiError, ApiResponse, AppState, FarmScope, LivestockRequest, MessageResponse};
use crate::models::livestock::{Livestock, NewLivestock};
use crate::services::AuthUser;

const DEFAULT_HEALTH_STATUS: &str = "Healthy";

/// POST /livestock?farmId=
pub async fn create_livestock(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Query(scope): Query<FarmScope>,
    Json(payload): Json<LivestockRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Livestock>>), ApiError> {
    let farm_id = require_farm_id(scope.farm_id.as_deref())?;
    let livestock_type = require_field("type", &payload.livestock_type)?.to_string();
    let count = validate_count(payload.count)?;

    let (_, farm) = state.guard.authorize_farm(&caller, farm_id).await?;

    let animals = state
        .store
        .create_livestock(NewLivestock {
            farm_id: farm.farm_id,
            livestock_type,
            count,
            acquisition_date: payload.acquisition_date,
            health_status: non_empty(&payload.health_status)
                .unwrap_or(DEFAULT_HEALTH_STATUS)
                .to_string(),
            notes: payload.notes,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(animals))))
}

/// GET /livestock?farmId=
pub async fn list_livestock(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Query(scope): Query<FarmScope>,
) -> Result<Json<ApiResponse<Vec<Livestock>>>, ApiError> {
    let farm_id = require_farm_id(scope.farm_id.as_deref())?;
    let (_, farm) = state.guard.authorize_farm(&caller, farm_id).await?;

    let animals = state.store.list_livestock_for_farm(&farm.farm_id).await?;
    Ok(Json(ApiResponse::success(animals)))
}

/// GET /livestock/{id}
pub async fn get_livestock(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Livestock>>, ApiError> {
    let id = validate_public_id("livestock", &id)?;
    let animals: Livestock = state.guard.authorize(&caller, id).await?;
    Ok(Json(ApiResponse::success(animals)))
}

/// PUT /livestock/{id}
pub async fn update_livestock(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<LivestockRequest>,
) -> Result<Json<ApiResponse<Livestock>>, ApiError> {
    let id = validate_public_id("livestock", &id)?;
    let mut animals: Livestock = state.guard.authorize(&caller, id).await?;

    if let Some(livestock_type) = non_empty(&payload.livestock_type) {
        animals.livestock_type = livestock_type.to_string();
    }
    if payload.count > 0 {
        animals.count = payload.count;
    }
    if let Some(date) = payload.acquisition_date.as_deref().and_then(non_empty) {
        animals.acquisition_date = Some(date.to_string());
    }
    if let Some(health_status) = non_empty(&payload.health_status) {
        animals.health_status = health_status.to_string();
    }
    if let Some(notes) = non_empty(&payload.notes) {
        animals.notes = notes.to_string();
    }

    let animals = state.store.update_livestock(&animals).await?;
    Ok(Json(ApiResponse::success(animals)))
}

/// DELETE /livestock/{id}
pub async fn delete_livestock(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_public_id("livestock", &id)?;
    let animals: Livestock = state.guard.authorize(&caller, id).await?;

    if !state.store.delete_livestock(&animals.livestock_id).await? {
        return Err(ApiError::not_found("Livestock", id));
    }

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Livestock deleted successfully",
    ))))
}
