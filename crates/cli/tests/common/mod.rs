#![allow(dead_code)]

use std::sync::Arc;

use paymxnts_api::auth::identity::StoreIdentityProvider;
use paymxnts_api::auth::jwt::JwtConfig;
use paymxnts_api::auth::password::hash_password;
use paymxnts_api::config::{AdminConfig, ServerConfig, StorageBackend};
use paymxnts_api::router::build_app_router;
use paymxnts_api::state::AppState;
use paymxnts_api::ws::WsManager;
use paymxnts_cli::client::ApiClient;
use paymxnts_cli::session_cache::SessionCache;
use paymxnts_core::admin::AdminAllowList;
use paymxnts_db::{AdminAccountStore, MemoryStore, Store};
use paymxnts_events::EventBus;
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const ADMIN_EMAIL: &str = "boss@paymxnts.com";
pub const ADMIN_PASSWORD: &str = "admin-pass-123";
pub const AGENT_PASSWORD: &str = "agent-pass-123";

/// A live API server on a random port plus a client and a private cache.
pub struct Harness {
    pub client: ApiClient,
    pub cache: SessionCache,
    pub store: Arc<MemoryStore>,
    _home: TempDir,
}

/// Start a server whose access tokens live `access_token_expiry_mins`.
/// A negative value issues tokens that are already expired.
pub async fn start_with_expiry(access_token_expiry_mins: i64) -> Harness {
    let store = Arc::new(MemoryStore::new());
    store
        .upsert_admin(ADMIN_EMAIL, &hash_password(ADMIN_PASSWORD).unwrap())
        .await
        .unwrap();

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "cli-test-secret".to_string(),
            access_token_expiry_mins,
            refresh_token_expiry_days: 7,
        },
        admin: AdminConfig {
            allow_list: AdminAllowList::new([ADMIN_EMAIL]),
            bootstrap: None,
        },
        storage: StorageBackend::Memory,
        lead_notify_email: None,
    };

    let dyn_store: Arc<dyn Store> = store.clone();
    let state = AppState {
        store: dyn_store.clone(),
        config: Arc::new(config.clone()),
        identity: Arc::new(StoreIdentityProvider::new(dyn_store)),
        ws_manager: Arc::new(WsManager::new()),
        event_bus: Arc::new(EventBus::default()),
    };
    let router = build_app_router(state, &config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let home = tempfile::tempdir().unwrap();
    Harness {
        client: ApiClient::new(&format!("http://{addr}")).unwrap(),
        cache: SessionCache::new(home.path().join("session.json")),
        store,
        _home: home,
    }
}

pub async fn start() -> Harness {
    start_with_expiry(15).await
}
