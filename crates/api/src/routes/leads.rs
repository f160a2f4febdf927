//! Route definitions for the `/leads` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::leads;
use crate::state::AppState;

/// Routes mounted at `/leads`. Every route requires an agent.
///
/// ```text
/// GET  /              -> list_leads
/// POST /              -> create_lead
/// GET  /{id}/export   -> export_lead
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(leads::list_leads).post(leads::create_lead))
        .route("/{id}/export", get(leads::export_lead))
}
