use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, LogResetCodeSender, OwnershipGuard, ResetCodeSender, SeaOrmAuthService,
    TokenService,
};

pub mod auth;
mod crops;
mod employees;
mod error;
mod farms;
mod livestock;
mod observability;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub tokens: Arc<TokenService>,

    pub auth_service: Arc<dyn AuthService>,

    pub guard: OwnershipGuard,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

pub async fn create_app_state(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    create_app_state_with_sender(config, prometheus_handle, Arc::new(LogResetCodeSender)).await
}

/// Build state with a custom reset code channel.
pub async fn create_app_state_with_sender(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
    sender: Arc<dyn ResetCodeSender>,
) -> anyhow::Result<Arc<AppState>> {
    config.validate()?;

    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let tokens = Arc::new(TokenService::from_config(&config.auth)?);

    let auth_service: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(
        store.clone(),
        tokens.clone(),
        config.security.clone(),
        sender,
    ));

    Ok(Arc::new(AppState {
        config: Arc::new(config),
        guard: OwnershipGuard::new(store.clone()),
        store,
        tokens,
        auth_service,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = &state.config.server.cors_allowed_origins;

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password));

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .route("/health", get(health))
        .route("/ping", get(ping))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/refresh-token", post(auth::refresh_token))
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/password", put(auth::change_password))
        .route("/auth/account", delete(auth::deactivate_account))
        .route("/farms", post(farms::create_farm).get(farms::list_farms))
        .route(
            "/farms/{id}",
            get(farms::get_farm)
                .put(farms::update_farm)
                .delete(farms::delete_farm),
        )
        .route("/crops", post(crops::create_crop).get(crops::list_crops))
        .route(
            "/crops/{id}",
            get(crops::get_crop)
                .put(crops::update_crop)
                .delete(crops::delete_crop),
        )
        .route(
            "/livestock",
            post(livestock::create_livestock).get(livestock::list_livestock),
        )
        .route(
            "/livestock/{id}",
            get(livestock::get_livestock)
                .put(livestock::update_livestock)
                .delete(livestock::delete_livestock),
        )
        .route(
            "/employees",
            post(employees::create_employee).get(employees::list_employees),
        )
        .route(
            "/employees/{id}",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}

async fn health() -> &'static str {
    "OK"
}

async fn ping() -> &'static str {
    "."
}
