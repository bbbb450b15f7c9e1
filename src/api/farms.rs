use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{non_empty, require_field, validate_positive, validate_public_id};
use super::{ApiError, ApiResponse, AppState, FarmRequest, MessageResponse};
use crate::models::farm::{Farm, NewFarm};
use crate::services::AuthUser;

const DEFAULT_FARM_TYPE: &str = "Mixed";
const DEFAULT_STATUS: &str = "Active";

/// POST /farms
pub async fn create_farm(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<FarmRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Farm>>), ApiError> {
    let name = require_field("name", &payload.name)?.to_string();
    let size = validate_positive("size", payload.size)?;

    let owner = state.guard.resolve_caller(&caller).await?;

    let farm = state
        .store
        .create_farm(NewFarm {
            name,
            description: payload.description,
            location: payload.location,
            size,
            farm_type: non_empty(&payload.farm_type)
                .unwrap_or(DEFAULT_FARM_TYPE)
                .to_string(),
            status: non_empty(&payload.status)
                .unwrap_or(DEFAULT_STATUS)
                .to_string(),
            user_id: owner.user_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(farm))))
}

/// GET /farms
/// Farms owned by the caller
pub async fn list_farms(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<Farm>>>, ApiError> {
    let owner = state.guard.resolve_caller(&caller).await?;
    let farms = state.store.list_farms_for_user(&owner.user_id).await?;
    Ok(Json(ApiResponse::success(farms)))
}

/// GET /farms/{id}
pub async fn get_farm(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Farm>>, ApiError> {
    let id = validate_public_id("farm", &id)?;
    let farm: Farm = state.guard.authorize(&caller, id).await?;
    Ok(Json(ApiResponse::success(farm)))
}

/// PUT /farms/{id}
pub async fn update_farm(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<FarmRequest>,
) -> Result<Json<ApiResponse<Farm>>, ApiError> {
    let id = validate_public_id("farm", &id)?;
    let mut farm: Farm = state.guard.authorize(&caller, id).await?;

    if let Some(name) = non_empty(&payload.name) {
        farm.name = name.to_string();
    }
    if let Some(description) = non_empty(&payload.description) {
        farm.description = description.to_string();
    }
    if let Some(location) = non_empty(&payload.location) {
        farm.location = location.to_string();
    }
    if payload.size > 0.0 {
        farm.size = payload.size;
    }
    if let Some(farm_type) = non_empty(&payload.farm_type) {
        farm.farm_type = farm_type.to_string();
    }
    if let Some(status) = non_empty(&payload.status) {
        farm.status = status.to_string();
    }

    let farm = state.store.update_farm(&farm).await?;
    Ok(Json(ApiResponse::success(farm)))
}

/// DELETE /farms/{id}
pub async fn delete_farm(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_public_id("farm", &id)?;
    let farm: Farm = state.guard.authorize(&caller, id).await?;

    if !state.store.delete_farm(&farm.farm_id).await? {
        return Err(ApiError::not_found("Farm", id));
    }

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Farm deleted successfully",
    ))))
}
