pub mod admin;
pub mod auth;
pub mod health;
pub mod leads;
pub mod signup;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /signup                                   submit a signup (public)
///
/// /auth/login                               login (public)
/// /auth/refresh                             refresh (public)
/// /auth/logout                              logout (requires auth)
/// /auth/session                             resume a stored session
///
/// /admin/verifications                      pending queue (admin only)
/// /admin/verifications/ws                   live pending queue (WebSocket)
/// /admin/verifications/{id}/approve         approve (POST)
/// /admin/verifications/{id}/reject          reject (POST)
///
/// /leads                                    list, create (agent only)
/// /leads/{id}/export                        CSV download (agent only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Agent self-signup.
        .merge(signup::router())
        // Authentication routes (login, refresh, logout, session).
        .nest("/auth", auth::router())
        // Verification review.
        .nest("/admin", admin::router())
        // Lead capture.
        .nest("/leads", leads::router())
}
