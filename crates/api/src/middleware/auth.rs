//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use paymxnts_core::error::CoreError;
use paymxnts_core::types::DbId;
use paymxnts_db::SessionStore;

use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Authenticated principal extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// The token must be correctly signed, unexpired, and refer to a session row
/// that has not been revoked.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(principal_id = user.id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Agent id or admin account id (from `claims.sub`).
    pub id: DbId,
    /// `"agent"` or `"admin"`.
    pub role: String,
    pub email: String,
    pub session_id: DbId,
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

/// Resolve a raw access token to its principal.
///
/// Shared by the header extractor and the WebSocket upgrade, which carries
/// the token as a query parameter.
pub async fn authenticate_token(state: &AppState, token: &str) -> AppResult<AuthUser> {
    let claims = validate_token(token, &state.config.jwt)
        .map_err(|_| unauthorized("Invalid or expired token"))?;

    let session = state
        .store
        .find_live_session(claims.sid)
        .await?
        .ok_or_else(|| unauthorized("Session has ended. Please log in again."))?;

    if session.principal_id != claims.sub || session.principal_kind != claims.role {
        return Err(unauthorized("Invalid or expired token"));
    }

    Ok(AuthUser {
        id: claims.sub,
        role: claims.role,
        email: claims.email,
        session_id: claims.sid,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        authenticate_token(state, token).await
    }
}
