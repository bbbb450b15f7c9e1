use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::observability::RequestSpan;
use super::validation::{require_field, validate_email};
use super::{
    ApiError, ApiResponse, AppState, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest,
    MessageResponse, ResetPasswordRequest, SignupRequest,
};
use crate::models::account::Account;
use crate::services::{AuthUser, LoginResult, SignupInput};

// ============================================================================
// Middleware
// ============================================================================

/// Requires `Authorization: Bearer <token>`. On success the validated
/// [`AuthUser`] is attached as a request extension for handlers to extract.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(&headers)
        .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

    let claims = state.tokens.validate(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        ApiError::from(e)
    })?;

    let caller = AuthUser::from(claims);
    if let Some(span) = request.extensions().get::<RequestSpan>() {
        span.record_user(caller.id);
    }
    request.extensions_mut().insert(caller);

    Ok(next.run(request).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// ============================================================================
// Public handlers
// ============================================================================

/// POST /auth/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LoginResult>>), ApiError> {
    let first_name = require_field("firstName", &payload.first_name)?.to_string();
    let last_name = require_field("lastName", &payload.last_name)?.to_string();
    let email = validate_email(&payload.email)?.to_string();
    require_field("password", &payload.password)?;

    let result = state
        .auth_service
        .signup(SignupInput {
            first_name,
            last_name,
            email,
            password: payload.password,
            role: payload.role,
            phone_number: payload.phone_number,
            address: payload.address,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(result))))
}

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResult>>, ApiError> {
    let email = require_field("email", &payload.email)?;
    require_field("password", &payload.password)?;

    let result = state
        .auth_service
        .login(email, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// POST /auth/forgot-password
/// Always answers the same way so callers cannot tell which emails are registered.
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let email = require_field("email", &payload.email)?;

    state.auth_service.request_password_reset(email).await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "If the email is registered, a reset code has been sent",
    ))))
}

/// POST /auth/reset-password
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let email = require_field("email", &payload.email)?;
    let code = require_field("code", &payload.code)?;
    require_field("newPassword", &payload.new_password)?;

    state
        .auth_service
        .reset_password(email, code, &payload.new_password)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Password reset successfully",
    ))))
}

// ============================================================================
// Protected handlers
// ============================================================================

/// POST /auth/refresh-token
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<ApiResponse<LoginResult>>, ApiError> {
    let result = state.auth_service.refresh_token(&caller).await?;
    Ok(Json(ApiResponse::success(result)))
}

/// GET /auth/me
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Account>>, ApiError> {
    let account = state.auth_service.current_account(&caller).await?;
    Ok(Json(ApiResponse::success(account)))
}

/// PUT /auth/password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    require_field("currentPassword", &payload.current_password)?;
    require_field("newPassword", &payload.new_password)?;

    state
        .auth_service
        .change_password(&caller, &payload.current_password, &payload.new_password)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Password changed successfully",
    ))))
}

/// DELETE /auth/account
pub async fn deactivate_account(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    state.auth_service.deactivate(&caller).await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Account deactivated",
    ))))
}
