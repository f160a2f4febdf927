use axum::routing::post;
use axum::Router;

use crate::handlers::signup;
use crate::state::AppState;

/// `POST /signup`, merged at the API root.
pub fn router() -> Router<AppState> {
    Router::new().route("/signup", post(signup::submit_signup))
}
