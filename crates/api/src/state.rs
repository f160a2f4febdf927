use std::sync::Arc;

use paymxnts_db::Store;
use paymxnts_events::EventBus;

use crate::auth::identity::IdentityProvider;
use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Persistence (Postgres or in-memory).
    pub store: Arc<dyn Store>,
    pub config: Arc<ServerConfig>,
    /// Signs allow-listed admins in.
    pub identity: Arc<dyn IdentityProvider>,
    /// WebSocket connection manager (admin review feeds).
    pub ws_manager: Arc<WsManager>,
    /// Centralized event bus for publishing workflow events.
    pub event_bus: Arc<EventBus>,
}
