use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use paymxnts_db::{MemoryStore, PgStore, Store};
use paymxnts_events::{EmailConfig, EventBus, LeadMailer, LeadNotifier};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paymxnts_api::auth::identity::StoreIdentityProvider;
use paymxnts_api::auth::password::hash_password;
use paymxnts_api::background::session_cleanup;
use paymxnts_api::config::{ServerConfig, StorageBackend};
use paymxnts_api::router::build_app_router;
use paymxnts_api::state::AppState;
use paymxnts_api::ws;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paymxnts_api=debug,paymxnts_events=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage = ?config.storage,
        admins = config.admin.allow_list.len(),
        "Loaded server configuration"
    );
    if config.admin.allow_list.is_empty() {
        tracing::warn!("ADMIN_EMAILS is empty; nobody can review verification requests");
    }

    // --- Storage ---
    let store: Arc<dyn Store> = match config.storage {
        StorageBackend::Postgres => {
            let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

            let pool = paymxnts_db::create_pool(&database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            paymxnts_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            paymxnts_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; all data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // --- Admin bootstrap ---
    if let Some(bootstrap) = &config.admin.bootstrap {
        let hash = hash_password(&bootstrap.password).expect("Failed to hash bootstrap password");
        let admin = store
            .upsert_admin(&bootstrap.email, &hash)
            .await
            .expect("Failed to seed admin account");
        tracing::info!(admin_id = admin.id, email = %admin.email, "Admin account seeded");
    }

    // --- WebSocket manager ---
    let ws_manager = Arc::new(ws::WsManager::new());
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&ws_manager));

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    tracing::info!("Event bus created");

    let cancel = CancellationToken::new();

    // Lead notification emails, only when SMTP and a recipient are configured.
    let notifier_handle = match (EmailConfig::from_env(), config.lead_notify_email.clone()) {
        (Some(email_config), Some(recipient)) => {
            let notifier = LeadNotifier::new(LeadMailer::new(email_config), recipient);
            Some(tokio::spawn(
                notifier.run(event_bus.subscribe(), cancel.clone()),
            ))
        }
        (None, Some(_)) => {
            tracing::warn!("LEAD_NOTIFY_EMAIL is set but SMTP_HOST is not; lead emails disabled");
            None
        }
        _ => None,
    };

    let cleanup_handle = tokio::spawn(session_cleanup::run(
        Arc::clone(&store),
        session_cleanup::CLEANUP_INTERVAL,
        cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        store: Arc::clone(&store),
        config: Arc::new(config.clone()),
        identity: Arc::new(StoreIdentityProvider::new(Arc::clone(&store))),
        ws_manager: Arc::clone(&ws_manager),
        event_bus: Arc::clone(&event_bus),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    let grace = Duration::from_secs(config.shutdown_timeout_secs);

    cancel.cancel();
    let _ = tokio::time::timeout(grace, cleanup_handle).await;
    if let Some(handle) = notifier_handle {
        let _ = tokio::time::timeout(grace, handle).await;
    }
    tracing::info!("Background tasks stopped");

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    heartbeat_handle.abort();
    tracing::info!("Heartbeat task stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
