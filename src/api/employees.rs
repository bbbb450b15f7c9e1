use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{non_empty, require_farm_id, require_field, validate_public_id};
use super::{ApiError, ApiResponse, AppState, EmployeeRequest, FarmScope, MessageResponse};
use crate::models::employee::{Employee, NewEmployee};
use crate::services::AuthUser;

const DEFAULT_STATUS: &str = "Active";

/// Resolve the optional `userId` field (an account email) to that account's
/// public id. The link is informational and grants no access.
async fn resolve_linked_user(
    state: &AppState,
    email: Option<&str>,
) -> Result<Option<String>, ApiError> {
    let Some(email) = email.and_then(non_empty) else {
        return Ok(None);
    };

    state
        .store
        .get_account_by_email(email)
        .await?
        .map(|account| Some(account.user_id))
        .ok_or_else(|| ApiError::validation("linked user not found"))
}

/// POST /employees?farmId=
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Query(scope): Query<FarmScope>,
    Json(payload): Json<EmployeeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Employee>>), ApiError> {
    let farm_id = require_farm_id(scope.farm_id.as_deref())?;
    let first_name = require_field("firstName", &payload.first_name)?.to_string();
    let last_name = require_field("lastName", &payload.last_name)?.to_string();
    let position = require_field("position", &payload.position)?.to_string();
    if payload.salary < 0.0 {
        return Err(ApiError::validation("salary cannot be negative"));
    }

    let (_, farm) = state.guard.authorize_farm(&caller, farm_id).await?;
    let user_id = resolve_linked_user(&state, payload.user_id.as_deref()).await?;

    let employee = state
        .store
        .create_employee(NewEmployee {
            farm_id: farm.farm_id,
            user_id,
            first_name,
            last_name,
            position,
            salary: payload.salary,
            hire_date: payload.hire_date,
            contact_info: payload.contact_info,
            status: non_empty(&payload.status)
                .unwrap_or(DEFAULT_STATUS)
                .to_string(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(employee))))
}

/// GET /employees?farmId=
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Query(scope): Query<FarmScope>,
) -> Result<Json<ApiResponse<Vec<Employee>>>, ApiError> {
    let farm_id = require_farm_id(scope.farm_id.as_deref())?;
    let (_, farm) = state.guard.authorize_farm(&caller, farm_id).await?;

    let employees = state.store.list_employees_for_farm(&farm.farm_id).await?;
    Ok(Json(ApiResponse::success(employees)))
}

/// GET /employees/{id}
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Employee>>, ApiError> {
    let id = validate_public_id("employee", &id)?;
    let employee: Employee = state.guard.authorize(&caller, id).await?;
    Ok(Json(ApiResponse::success(employee)))
}

/// PUT /employees/{id}
pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<EmployeeRequest>,
) -> Result<Json<ApiResponse<Employee>>, ApiError> {
    let id = validate_public_id("employee", &id)?;
    let mut employee: Employee = state.guard.authorize(&caller, id).await?;

    if let Some(user_id) = resolve_linked_user(&state, payload.user_id.as_deref()).await? {
        employee.user_id = Some(user_id);
    }
    if let Some(first_name) = non_empty(&payload.first_name) {
        employee.first_name = first_name.to_string();
    }
    if let Some(last_name) = non_empty(&payload.last_name) {
        employee.last_name = last_name.to_string();
    }
    if let Some(position) = non_empty(&payload.position) {
        employee.position = position.to_string();
    }
    if payload.salary > 0.0 {
        employee.salary = payload.salary;
    }
    if let Some(hire_date) = payload.hire_date.as_deref().and_then(non_empty) {
        employee.hire_date = Some(hire_date.to_string());
    }
    if let Some(contact_info) = non_empty(&payload.contact_info) {
        employee.contact_info = contact_info.to_string();
    }
    if let Some(status) = non_empty(&payload.status) {
        employee.status = status.to_string();
    }

    let employee = state.store.update_employee(&employee).await?;
    Ok(Json(ApiResponse::success(employee)))
}

/// DELETE /employees/{id}
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_public_id("employee", &id)?;
    let employee: Employee = state.guard.authorize(&caller, id).await?;

    if !state.store.delete_employee(&employee.employee_id).await? {
        return Err(ApiError::not_found("Employee", id));
    }

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Employee deleted successfully",
    ))))
}
