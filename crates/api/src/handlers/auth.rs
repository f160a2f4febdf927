//! Handlers for the `/auth` resource (login, refresh, logout, session resume).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use paymxnts_core::contact::normalize_email;
use paymxnts_core::error::CoreError;
use paymxnts_core::login::{validate_credentials, MSG_INVALID_CREDENTIALS};
use paymxnts_core::navigation::Route;
use paymxnts_core::roles::{ROLE_ADMIN, ROLE_AGENT};
use paymxnts_core::types::DbId;
use paymxnts_db::models::session::CreateSession;
use paymxnts_db::{AdminAccountStore, AgentStore, SessionStore};
use serde::{Deserialize, Serialize};

use crate::auth::identity::IdentityError;
use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, hash_refresh_token, TokenSubject,
};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Display name used for admin principals.
const ADMIN_DISPLAY_NAME: &str = "Admin";

const MSG_ACCOUNT_GONE: &str = "Account no longer exists. Please log in again.";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`. Missing fields count as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub principal: PrincipalInfo,
    /// Screen the client should show next.
    pub route: Route,
}

/// Public principal info embedded in auth and session responses.
#[derive(Debug, Clone, Serialize)]
pub struct PrincipalInfo {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: String,
}

/// Body of `GET /auth/session`.
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub principal: PrincipalInfo,
    pub session_id: DbId,
    pub route: Route,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Allow-listed emails are checked by the identity provider; every other
/// email must belong to an active agent with a matching password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    validate_credentials(&input.email, &input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let email = normalize_email(&input.email);

    if state.config.admin.allow_list.contains(&email) {
        let identity = state
            .identity
            .sign_in(&email, &input.password)
            .await
            .map_err(identity_error)?;
        tracing::info!(admin_id = identity.id, "Admin signed in");

        let principal = PrincipalInfo {
            id: identity.id,
            email: identity.email,
            name: ADMIN_DISPLAY_NAME.to_string(),
            role: ROLE_ADMIN.to_string(),
        };
        return Ok(Json(create_auth_response(&state, principal).await?));
    }

    let agent = state
        .store
        .find_active_agent_by_email(&email)
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&input.password, &agent.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid_credentials());
    }

    state.store.record_agent_login(agent.id).await?;
    tracing::info!(agent_id = agent.id, "Agent logged in");

    let principal = PrincipalInfo {
        id: agent.id,
        name: agent.full_name(),
        email: agent.email,
        role: ROLE_AGENT.to_string(),
    };
    Ok(Json(create_auth_response(&state, principal).await?))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens. The old
/// session is revoked (token rotation).
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = state
        .store
        .find_session_by_refresh_hash(&token_hash)
        .await?
        .ok_or_else(invalid_refresh_token)?;

    // Only the request that actually revokes the old session may rotate it.
    if !state.store.revoke_session(session.id).await? {
        tracing::warn!(session_id = session.id, "Refresh token already rotated");
        return Err(invalid_refresh_token());
    }

    let principal = resolve_principal(
        &state,
        &session.principal_kind,
        session.principal_id,
        &session.email,
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::Unauthorized(MSG_ACCOUNT_GONE.into())))?;

    Ok(Json(create_auth_response(&state, principal).await?))
}

/// GET /api/v1/auth/session
///
/// Resume a cached session: re-resolve the principal behind the token. If
/// the principal no longer exists the session is revoked and 401 returned,
/// so the client drops its cache instead of looping on a dead session.
pub async fn resume_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<SessionInfo>>> {
    let Some(principal) =
        resolve_principal(&state, &auth_user.role, auth_user.id, &auth_user.email).await?
    else {
        state.store.revoke_session(auth_user.session_id).await?;
        tracing::info!(
            principal_id = auth_user.id,
            role = %auth_user.role,
            "Session revoked, principal no longer exists"
        );
        return Err(AppError::Core(CoreError::Unauthorized(MSG_ACCOUNT_GONE.into())));
    };

    let route = Route::home_for_role(&principal.role);
    Ok(Json(DataResponse {
        data: SessionInfo {
            principal,
            session_id: auth_user.session_id,
            route,
        },
    }))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated principal. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    let revoked = state
        .store
        .revoke_sessions_for_principal(&auth_user.role, auth_user.id)
        .await?;
    if auth_user.role == ROLE_ADMIN {
        state.ws_manager.close_for_admin(auth_user.id).await;
    }
    tracing::info!(principal_id = auth_user.id, role = %auth_user.role, revoked, "Logged out");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(MSG_INVALID_CREDENTIALS.into()))
}

fn invalid_refresh_token() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid or expired refresh token".into(),
    ))
}

/// Map an identity provider failure to the response the client shows.
fn identity_error(err: IdentityError) -> AppError {
    let message = err.code().user_message().to_string();
    match err {
        IdentityError::InvalidCredential => AppError::Core(CoreError::Unauthorized(message)),
        IdentityError::TooManyRequests => AppError::Core(CoreError::TooManyRequests(message)),
        IdentityError::NetworkRequestFailed(detail) => {
            tracing::error!(error = %detail, "Identity provider failure");
            AppError::Core(CoreError::Unavailable(message))
        }
    }
}

/// Look up the current state of a session's principal.
///
/// Returns `None` when the agent is gone (or no longer active), or when an
/// admin has been removed from the allow-list or the account table.
async fn resolve_principal(
    state: &AppState,
    kind: &str,
    id: DbId,
    email: &str,
) -> AppResult<Option<PrincipalInfo>> {
    match kind {
        ROLE_AGENT => Ok(state
            .store
            .find_agent(id)
            .await?
            .filter(|agent| agent.status == paymxnts_core::agent::AGENT_STATUS_ACTIVE)
            .map(|agent| PrincipalInfo {
                id: agent.id,
                name: agent.full_name(),
                email: agent.email,
                role: ROLE_AGENT.to_string(),
            })),
        ROLE_ADMIN => {
            if !state.config.admin.allow_list.contains(email) {
                return Ok(None);
            }
            Ok(state
                .store
                .find_admin_by_email(email)
                .await?
                .filter(|admin| admin.id == id)
                .map(|admin| PrincipalInfo {
                    id: admin.id,
                    email: admin.email,
                    name: ADMIN_DISPLAY_NAME.to_string(),
                    role: ROLE_ADMIN.to_string(),
                }))
        }
        _ => Ok(None),
    }
}

/// Persist a session row, issue tokens for it, and build the response.
async fn create_auth_response(
    state: &AppState,
    principal: PrincipalInfo,
) -> AppResult<AuthResponse> {
    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    let session = state
        .store
        .create_session(&CreateSession {
            principal_kind: principal.role.clone(),
            principal_id: principal.id,
            email: principal.email.clone(),
            refresh_token_hash: refresh_hash,
            expires_at,
        })
        .await?;

    let access_token = generate_access_token(
        TokenSubject {
            principal_id: principal.id,
            role: &principal.role,
            email: &principal.email,
            session_id: session.id,
        },
        &state.config.jwt,
    )
    .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let route = Route::home_for_role(&principal.role);

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        principal,
        route,
    })
}
