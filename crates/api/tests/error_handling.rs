//! Error response shape for malformed input and missing resources.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{admin_token, body_json, post_json_auth};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn not_found_errors_use_json_envelope() {
    let app = common::build_test_app().await;
    let token = admin_token(&app).await;

    let response = post_json_auth(
        &app,
        "/api/v1/admin/verifications/424242/approve",
        json!({}),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "AgentVerification with id 424242 not found");
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let app = common::build_test_app().await;
    let request = Request::post("/api/v1/signup")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn non_numeric_path_id_is_a_client_error() {
    let app = common::build_test_app().await;
    let token = admin_token(&app).await;

    let response = post_json_auth(
        &app,
        "/api/v1/admin/verifications/abc/approve",
        json!({}),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bearer_prefix_is_required() {
    let app = common::build_test_app().await;
    let token = admin_token(&app).await;
    let request = Request::get("/api/v1/admin/verifications")
        .header("authorization", token)
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}
