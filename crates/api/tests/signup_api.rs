//! HTTP-level tests for agent self-signup.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json, signup_body};
use paymxnts_db::VerificationStore;
use serde_json::json;

#[tokio::test]
async fn test_signup_creates_pending_request_and_routes_to_pending() {
    let app = common::build_test_app().await;

    let mut body = signup_body("Ada", "Lovelace", "  Ada@Example.COM ");
    body["first_name"] = json!("  Ada ");
    let response = post_json(&app, "/api/v1/signup", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let request = &json["data"]["request"];
    assert_eq!(request["first_name"], "Ada");
    assert_eq!(request["email"], "ada@example.com");
    assert_eq!(request["phone"], "+15551234567");
    assert_eq!(request["status"], "pending");
    assert!(request.get("password_hash").is_none());

    assert_eq!(json["data"]["route"]["screen"], "pending");
    assert_eq!(json["data"]["route"]["email"], "ada@example.com");

    let pending = app.store.list_pending_verifications().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_ne!(pending[0].password_hash, common::AGENT_PASSWORD);
}

#[tokio::test]
async fn test_signup_missing_field_is_rejected_without_writing() {
    let app = common::build_test_app().await;

    let mut body = signup_body("Ada", "Lovelace", "ada@example.com");
    body["last_name"] = json!("   ");
    let response = post_json(&app, "/api/v1/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Please fill in all fields");
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(app.store.list_pending_verifications().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_signup_password_mismatch_is_rejected() {
    let app = common::build_test_app().await;

    let mut body = signup_body("Ada", "Lovelace", "ada@example.com");
    body["confirm_password"] = json!("something-else");
    let response = post_json(&app, "/api/v1/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Passwords do not match");
    assert!(app.store.list_pending_verifications().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_signup_requires_accepted_terms() {
    let app = common::build_test_app().await;

    let mut body = signup_body("Ada", "Lovelace", "ada@example.com");
    body["accepted_terms"] = json!(false);
    let response = post_json(&app, "/api/v1/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Please accept the Terms & Policies"
    );
}

#[tokio::test]
async fn test_signup_with_omitted_fields_counts_them_as_blank() {
    let app = common::build_test_app().await;

    let response = post_json(&app, "/api/v1/signup", json!({ "email": "a@b.com" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Please fill in all fields");
}

#[tokio::test]
async fn test_repeated_signup_files_separate_requests() {
    let app = common::build_test_app().await;

    common::signup(&app, "Ada", "Lovelace", "ada@example.com").await;
    common::signup(&app, "Ada", "Lovelace", "ada@example.com").await;

    assert_eq!(app.store.list_pending_verifications().await.unwrap().len(), 2);
}
