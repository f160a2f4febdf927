//! Route definitions for the `/admin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::verification;
use crate::state::AppState;
use crate::ws;

/// Routes mounted at `/admin`. Every route requires an allow-listed admin.
///
/// ```text
/// GET  /verifications                -> list_pending
/// GET  /verifications/ws             -> pending queue feed (WebSocket)
/// POST /verifications/{id}/approve   -> approve
/// POST /verifications/{id}/reject    -> reject
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/verifications", get(verification::list_pending))
        .route("/verifications/ws", get(ws::pending_feed_handler))
        .route("/verifications/{id}/approve", post(verification::approve))
        .route("/verifications/{id}/reject", post(verification::reject))
}
