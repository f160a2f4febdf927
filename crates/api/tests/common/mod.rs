#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use paymxnts_core::admin::AdminAllowList;
use paymxnts_db::{AdminAccountStore, MemoryStore, Store};
use paymxnts_events::EventBus;
use serde_json::{json, Value};
use tower::ServiceExt;

use paymxnts_api::auth::identity::{IdentityProvider, StoreIdentityProvider};
use paymxnts_api::auth::jwt::JwtConfig;
use paymxnts_api::auth::password::hash_password;
use paymxnts_api::config::{AdminConfig, ServerConfig, StorageBackend};
use paymxnts_api::router::build_app_router;
use paymxnts_api::state::AppState;
use paymxnts_api::ws::WsManager;

pub const ADMIN_EMAIL: &str = "boss@paymxnts.com";
pub const ADMIN_PASSWORD: &str = "admin-pass-123";
pub const AGENT_PASSWORD: &str = "agent-pass-123";

/// Build a test `ServerConfig` with safe defaults and a single allow-listed
/// admin.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "test-secret-do-not-use".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        admin: AdminConfig {
            allow_list: AdminAllowList::new([ADMIN_EMAIL]),
            bootstrap: None,
        },
        storage: StorageBackend::Memory,
        lead_notify_email: None,
    }
}

/// A router over an in-memory store, with handles to the pieces tests
/// inspect directly.
#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over a fresh [`MemoryStore`] with the admin account seeded.
pub async fn build_test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(StoreIdentityProvider::new(store.clone()));
    build_test_app_with(store, identity).await
}

/// Like [`build_test_app`] but with a custom identity provider.
pub async fn build_test_app_with(
    store: Arc<MemoryStore>,
    identity: Arc<dyn IdentityProvider>,
) -> TestApp {
    let dyn_store: Arc<dyn Store> = store.clone();
    build_test_app_over(store, dyn_store, identity).await
}

/// Serve the router from `dyn_store`, which wraps or replaces `store`.
/// Seeding and direct inspection go through `store`.
pub async fn build_test_app_over(
    store: Arc<MemoryStore>,
    dyn_store: Arc<dyn Store>,
    identity: Arc<dyn IdentityProvider>,
) -> TestApp {
    store
        .upsert_admin(ADMIN_EMAIL, &hash_password(ADMIN_PASSWORD).unwrap())
        .await
        .unwrap();

    let config = test_config();
    let state = AppState {
        store: dyn_store,
        config: Arc::new(config.clone()),
        identity,
        ws_manager: Arc::new(WsManager::new()),
        event_bus: Arc::new(EventBus::default()),
    };

    TestApp {
        router: build_app_router(state.clone(), &config),
        store,
        state,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: &TestApp, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &TestApp, uri: &str, body: Value) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(app: &TestApp, uri: &str, body: Value, token: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Workflow helpers
// ---------------------------------------------------------------------------

pub fn signup_body(first: &str, last: &str, email: &str) -> Value {
    json!({
        "first_name": first,
        "last_name": last,
        "email": email,
        "country_code": "+1",
        "phone": "5551234567",
        "password": AGENT_PASSWORD,
        "confirm_password": AGENT_PASSWORD,
        "accepted_terms": true,
    })
}

/// Submit a signup and return the created verification request.
pub async fn signup(app: &TestApp, first: &str, last: &str, email: &str) -> Value {
    let response = post_json(app, "/api/v1/signup", signup_body(first, last, email)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["request"].clone()
}

/// Log in and return the full auth response.
pub async fn login(app: &TestApp, email: &str, password: &str) -> Value {
    let body = json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

pub async fn admin_token(app: &TestApp) -> String {
    login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Sign up, approve, and log in an agent. Returns the agent access token.
pub async fn approved_agent_token(app: &TestApp, first: &str, last: &str, email: &str) -> String {
    let request = signup(app, first, last, email).await;
    let admin = admin_token(app).await;
    let uri = format!(
        "/api/v1/admin/verifications/{}/approve",
        request["id"].as_i64().unwrap()
    );
    let response = post_json_auth(app, &uri, json!({}), &admin).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    login(app, email, AGENT_PASSWORD).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

pub fn lead_body(first: &str, last: &str) -> Value {
    json!({
        "first_name": first,
        "last_name": last,
        "business_name": "Corner Bakery",
        "phone": "(555) 987-6543",
        "email_address": "owner@cornerbakery.com",
        "zip_code": "94107",
        "credit_processing_volume": "Under $25,000/Month",
        "notes": "Prefers mornings",
    })
}
