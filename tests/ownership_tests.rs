mod common;

use axum::http::{Method, StatusCode};
use common::{create_farm, send, signup, spawn_app};
use farm4u::models::crop::Crop;
use farm4u::models::farm::Farm;
use farm4u::services::{AccessError, AuthUser};
use serde_json::json;

const MISSING_ID: &str = "00000000-0000-4000-8000-000000000000";

async fn create_child(
    app: &axum::Router,
    token: &str,
    path: &str,
    farm_id: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(
        app,
        Method::POST,
        &format!("/api/{path}?farmId={farm_id}"),
        Some(token),
        Some(body),
    )
    .await
}

#[tokio::test]
async fn test_farm_crud_for_owner() {
    let (app, _) = spawn_app().await;
    let (token, user_id) = signup(&app, "owner@example.com").await;

    let farm_id = create_farm(&app, &token, "North Field").await;
    let farm_uri = format!("/api/farms/{farm_id}");

    let (status, body) = send(&app, Method::GET, &farm_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["userId"], user_id);
    assert_eq!(body["data"]["farmType"], "Mixed");
    assert_eq!(body["data"]["status"], "Active");

    // Only non-empty fields overwrite.
    let (status, body) = send(
        &app,
        Method::PUT,
        &farm_uri,
        Some(&token),
        Some(json!({ "name": "South Field", "location": "", "size": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "South Field");
    assert_eq!(body["data"]["location"], "Valley");
    assert_eq!(body["data"]["size"], 40.5);

    let (status, body) = send(&app, Method::GET, "/api/farms", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &farm_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &farm_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/api/farms", Some(&token), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_farm_validation() {
    let (app, _) = spawn_app().await;
    let (token, _) = signup(&app, "strict@example.com").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/farms",
        Some(&token),
        Some(json!({ "name": "Tiny", "size": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/api/farms/not-a-uuid", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/farms/{MISSING_ID}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cross_tenant_access_is_forbidden() {
    let (app, _) = spawn_app().await;
    let (alice, _) = signup(&app, "alice@example.com").await;
    let (bob, _) = signup(&app, "bob@example.com").await;

    let farm_id = create_farm(&app, &alice, "Alice Acres").await;

    let (_, crop) = create_child(
        &app,
        &alice,
        "crops",
        &farm_id,
        json!({ "name": "Wheat", "quantity": 12.0 }),
    )
    .await;
    let crop_id = crop["data"]["cropId"].as_str().unwrap().to_string();

    let (_, herd) = create_child(
        &app,
        &alice,
        "livestock",
        &farm_id,
        json!({ "type": "Cattle", "count": 8 }),
    )
    .await;
    let livestock_id = herd["data"]["livestockId"].as_str().unwrap().to_string();

    let (_, worker) = create_child(
        &app,
        &alice,
        "employees",
        &farm_id,
        json!({
            "firstName": "Sam",
            "lastName": "Hand",
            "position": "Picker",
            "salary": 1200.0,
        }),
    )
    .await;
    let employee_id = worker["data"]["employeeId"].as_str().unwrap().to_string();

    for uri in [
        format!("/api/farms/{farm_id}"),
        format!("/api/crops/{crop_id}"),
        format!("/api/livestock/{livestock_id}"),
        format!("/api/employees/{employee_id}"),
    ] {
        let (status, body) = send(&app, Method::GET, &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "GET {uri}");
        assert_eq!(body["success"], false);

        let (status, _) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&bob),
            Some(json!({ "notes": "mine" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "PUT {uri}");

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "DELETE {uri}");

        let (status, _) = send(&app, Method::GET, &uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::OK, "owner GET {uri}");
    }

    for path in ["crops", "livestock", "employees"] {
        let uri = format!("/api/{path}?farmId={farm_id}");
        let (status, _) = send(&app, Method::GET, &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "list {path}");
    }

    let (status, _) = create_child(
        &app,
        &bob,
        "crops",
        &farm_id,
        json!({ "name": "Weeds", "quantity": 1.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let crops_uri = format!("/api/crops?farmId={farm_id}");
    let (_, body) = send(&app, Method::GET, &crops_uri, Some(&alice), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, Method::GET, "/api/farms", Some(&bob), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_token_of_deactivated_account_cannot_reach_new_owner() {
    let (app, _) = spawn_app().await;
    let (old_token, old_user_id) = signup(&app, "reuse@example.com").await;

    let (status, _) = send(&app, Method::DELETE, "/api/auth/account", Some(&old_token), None).await;
    assert_eq!(status, StatusCode::OK);

    // Same email, new account.
    let (new_token, new_user_id) = signup(&app, "reuse@example.com").await;
    assert_ne!(old_user_id, new_user_id);

    let farm_id = create_farm(&app, &new_token, "Fresh Start").await;
    let farm_uri = format!("/api/farms/{farm_id}");

    let (status, _) = send(&app, Method::GET, &farm_uri, Some(&old_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PUT,
        &farm_uri,
        Some(&old_token),
        Some(json!({ "name": "Taken Over" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &farm_uri, Some(&old_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/api/farms", Some(&old_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = create_child(
        &app,
        &old_token,
        "crops",
        &farm_id,
        json!({ "name": "Barley", "quantity": 4.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The new owner is untouched.
    let (status, body) = send(&app, Method::GET, &farm_uri, Some(&new_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Fresh Start");
    assert_eq!(body["data"]["userId"], new_user_id);
}

#[tokio::test]
async fn test_children_of_unknown_farm_are_denied() {
    let (app, _) = spawn_app().await;
    let (token, _) = signup(&app, "lost@example.com").await;

    let (status, _) = create_child(
        &app,
        &token,
        "livestock",
        MISSING_ID,
        json!({ "type": "Goat", "count": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::GET, "/api/employees", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_children_of_deleted_farm_are_denied() {
    let (app, _) = spawn_app().await;
    let (token, _) = signup(&app, "orphan@example.com").await;
    let farm_id = create_farm(&app, &token, "Short Lived").await;

    let (_, crop) = create_child(
        &app,
        &token,
        "crops",
        &farm_id,
        json!({ "name": "Corn", "quantity": 3.0 }),
    )
    .await;
    let crop_id = crop["data"]["cropId"].as_str().unwrap().to_string();

    let farm_uri = format!("/api/farms/{farm_id}");
    send(&app, Method::DELETE, &farm_uri, Some(&token), None).await;

    let crop_uri = format!("/api/crops/{crop_id}");
    let (status, _) = send(&app, Method::GET, &crop_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_soft_deleted_child_is_not_found() {
    let (app, _) = spawn_app().await;
    let (token, _) = signup(&app, "tidy@example.com").await;
    let farm_id = create_farm(&app, &token, "Tidy Farm").await;

    let (status, herd) = create_child(
        &app,
        &token,
        "livestock",
        &farm_id,
        json!({ "type": "Sheep", "count": 20 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(herd["data"]["type"], "Sheep");
    assert_eq!(herd["data"]["healthStatus"], "Healthy");
    let livestock_id = herd["data"]["livestockId"].as_str().unwrap().to_string();
    let livestock_uri = format!("/api/livestock/{livestock_id}");

    let (status, body) = send(
        &app,
        Method::PUT,
        &livestock_uri,
        Some(&token),
        Some(json!({ "count": 25 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 25);
    assert_eq!(body["data"]["type"], "Sheep");

    let (status, _) = send(&app, Method::DELETE, &livestock_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &livestock_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let list_uri = format!("/api/livestock?farmId={farm_id}");
    let (_, body) = send(&app, Method::GET, &list_uri, Some(&token), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_employee_user_link_resolves_by_email() {
    let (app, _) = spawn_app().await;
    let (owner, _) = signup(&app, "boss@example.com").await;
    let (_, worker_user_id) = signup(&app, "worker@example.com").await;
    let farm_id = create_farm(&app, &owner, "Busy Farm").await;

    let (status, body) = create_child(
        &app,
        &owner,
        "employees",
        &farm_id,
        json!({
            "firstName": "Wes",
            "lastName": "Worker",
            "position": "Driver",
            "userId": "nobody@example.com",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "linked user not found");

    let (status, body) = create_child(
        &app,
        &owner,
        "employees",
        &farm_id,
        json!({
            "firstName": "Wes",
            "lastName": "Worker",
            "position": "Driver",
            "userId": "worker@example.com",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["userId"], worker_user_id);
    assert_eq!(body["data"]["status"], "Active");
}

#[tokio::test]
async fn test_guard_directly() {
    let (app, state) = spawn_app().await;
    let (alice_token, _) = signup(&app, "ga@example.com").await;
    let (bob_token, _) = signup(&app, "gb@example.com").await;

    let alice = AuthUser::from(state.tokens.validate(&alice_token).unwrap());
    let bob = AuthUser::from(state.tokens.validate(&bob_token).unwrap());

    let farm_id = create_farm(&app, &alice_token, "Guarded").await;
    let (_, crop) = create_child(
        &app,
        &alice_token,
        "crops",
        &farm_id,
        json!({ "name": "Rye", "quantity": 2.0 }),
    )
    .await;
    let crop_id = crop["data"]["cropId"].as_str().unwrap().to_string();

    let farm: Farm = state.guard.authorize(&alice, &farm_id).await.unwrap();
    assert_eq!(farm.farm_id, farm_id);

    let crop: Crop = state.guard.authorize(&alice, &crop_id).await.unwrap();
    assert_eq!(crop.farm_id, farm_id);

    assert!(matches!(
        state.guard.authorize::<Crop>(&bob, &crop_id).await,
        Err(AccessError::AccessDenied { kind: "Crop" })
    ));
    assert!(matches!(
        state.guard.authorize::<Farm>(&alice, MISSING_ID).await,
        Err(AccessError::ResourceNotFound { kind: "Farm" })
    ));
    assert!(matches!(
        state.guard.authorize_farm(&bob, &farm_id).await,
        Err(AccessError::AccessDenied { .. })
    ));

    let ghost = AuthUser {
        id: 9999,
        email: "ghost@example.com".to_string(),
        role: "Farmer".to_string(),
    };
    assert!(matches!(
        state.guard.authorize::<Farm>(&ghost, &farm_id).await,
        Err(AccessError::AccountNotFound)
    ));

    // Right id, wrong email: the claim set no longer describes this account.
    let impostor = AuthUser {
        email: "gb@example.com".to_string(),
        ..alice.clone()
    };
    assert!(matches!(
        state.guard.authorize::<Farm>(&impostor, &farm_id).await,
        Err(AccessError::AccountNotFound)
    ));
    assert!(matches!(
        state.guard.resolve_caller(&impostor).await,
        Err(AccessError::AccountNotFound)
    ));
}
