//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose principal
//! does not meet the requirement. Use these in route handlers to enforce
//! authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use paymxnts_core::error::CoreError;
use paymxnts_core::roles::{ROLE_ADMIN, ROLE_AGENT};

use super::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Check that `user` may act as an admin: the role claim must be `admin`
/// and the email must still be on the configured allow-list.
pub fn authorize_admin(state: &AppState, user: &AuthUser) -> AppResult<()> {
    if user.role != ROLE_ADMIN || !state.config.admin.allow_list.contains(&user.email) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Admin access required".into(),
        )));
    }
    Ok(())
}

/// Requires an allow-listed admin. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        authorize_admin(state, &user)?;
        Ok(RequireAdmin(user))
    }
}

/// Requires the `agent` role. Rejects with 403 Forbidden otherwise.
pub struct RequireAgent(pub AuthUser);

impl FromRequestParts<AppState> for RequireAgent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_AGENT {
            return Err(AppError::Core(CoreError::Forbidden(
                "Agent access required".into(),
            )));
        }
        Ok(RequireAgent(user))
    }
}
