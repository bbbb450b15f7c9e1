use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{
    non_empty, require_farm_id, require_field, validate_positive, validate_public_id,
};
use super::{ApiError, ApiResponse, AppState, CropRequest, FarmScope, MessageResponse};
use crate::models::crop::{Crop, NewCrop};
use crate::services::AuthUser;

const DEFAULT_STATUS: &str = "Growing";

/// POST /crops?farmId=
pub async fn create_crop(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Query(scope): Query<FarmScope>,
    Json(payload): Json<CropRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Crop>>), ApiError> {
    let farm_id = require_farm_id(scope.farm_id.as_deref())?;
    let name = require_field("name", &payload.name)?.to_string();
    let quantity = validate_positive("quantity", payload.quantity)?;

    let (_, farm) = state.guard.authorize_farm(&caller, farm_id).await?;

    let crop = state
        .store
        .create_crop(NewCrop {
            farm_id: farm.farm_id,
            name,
            planting_date: payload.planting_date,
            harvest_date: payload.harvest_date,
            quantity,
            status: non_empty(&payload.status)
                .unwrap_or(DEFAULT_STATUS)
                .to_string(),
            notes: payload.notes,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(crop))))
}

/// GET /crops?farmId=
pub async fn list_crops(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Query(scope): Query<FarmScope>,
) -> Result<Json<ApiResponse<Vec<Crop>>>, ApiError> {
    let farm_id = require_farm_id(scope.farm_id.as_deref())?;
    let (_, farm) = state.guard.authorize_farm(&caller, farm_id).await?;

    let crops = state.store.list_crops_for_farm(&farm.farm_id).await?;
    Ok(Json(ApiResponse::success(crops)))
}

/// GET /crops/{id}
pub async fn get_crop(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Crop>>, ApiError> {
    let id = validate_public_id("crop", &id)?;
    let crop: Crop = state.guard.authorize(&caller, id).await?;
    Ok(Json(ApiResponse::success(crop)))
}

/// PUT /crops/{id}
pub async fn update_crop(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<CropRequest>,
) -> Result<Json<ApiResponse<Crop>>, ApiError> {
    let id = validate_public_id("crop", &id)?;
    let mut crop: Crop = state.guard.authorize(&caller, id).await?;

    if let Some(name) = non_empty(&payload.name) {
        crop.name = name.to_string();
    }
    if let Some(planting_date) = payload.planting_date.as_deref().and_then(non_empty) {
        crop.planting_date = Some(planting_date.to_string());
    }
    if let Some(harvest_date) = payload.harvest_date.as_deref().and_then(non_empty) {
        crop.harvest_date = Some(harvest_date.to_string());
    }
    if payload.quantity > 0.0 {
        crop.quantity = payload.quantity;
    }
    if let Some(status) = non_empty(&payload.status) {
        crop.status = status.to_string();
    }
    if let Some(notes) = non_empty(&payload.notes) {
        crop.notes = notes.to_string();
    }

    let crop = state.store.update_crop(&crop).await?;
    Ok(Json(ApiResponse::success(crop)))
}

/// DELETE /crops/{id}
pub async fn delete_crop(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_public_id("crop", &id)?;
    let crop: Crop = state.guard.authorize(&caller, id).await?;

    if !state.store.delete_crop(&crop.crop_id).await? {
        return Err(ApiError::not_found("Crop", id));
    }

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Crop deleted successfully",
    ))))
}
