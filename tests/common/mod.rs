#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use farm4u::api::AppState;
use farm4u::config::Config;
use farm4u::services::{LogResetCodeSender, ResetCodeSender};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse-battery";

/// Records every reset code handed out instead of delivering it.
#[derive(Default)]
pub struct CapturingSender {
    pub sent: Mutex<Vec<(String, String, DateTime<Utc>)>>,
}

impl CapturingSender {
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _, _)| to == email)
            .map(|(_, code, _)| code.clone())
    }
}

#[async_trait]
impl ResetCodeSender for CapturingSender {
    async fn send(&self, email: &str, code: &str, expires_at: DateTime<Utc>) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string(), expires_at));
        Ok(())
    }
}

pub fn test_config() -> Config {
    let db_path = std::env::temp_dir().join(format!("farm4u-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.auth.jwt_secret = Some("integration-test-secret".to_string());
    // Cheap hashing keeps the suite fast.
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config
}

pub async fn spawn_app() -> (Router, Arc<AppState>) {
    spawn_app_with_sender(Arc::new(LogResetCodeSender)).await
}

pub async fn spawn_app_with_sender(sender: Arc<dyn ResetCodeSender>) -> (Router, Arc<AppState>) {
    let state = farm4u::api::create_app_state_with_sender(test_config(), None, sender)
        .await
        .expect("Failed to create app state");
    (farm4u::api::router(state.clone()), state)
}

/// Fire one request and decode the JSON body (`Value::Null` when not JSON).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Register an account and return `(token, public user id)`.
pub async fn signup(app: &Router, email: &str) -> (String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "firstName": "Test",
            "lastName": "Farmer",
            "email": email,
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");

    (
        body["data"]["token"].as_str().unwrap().to_string(),
        body["data"]["user"]["userId"].as_str().unwrap().to_string(),
    )
}

pub async fn create_farm(app: &Router, token: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/farms",
        Some(token),
        Some(json!({ "name": name, "location": "Valley", "size": 40.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "farm creation failed: {body}");
    body["data"]["farmId"].as_str().unwrap().to_string()
}
