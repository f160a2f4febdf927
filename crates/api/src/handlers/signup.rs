//! Handler for agent self-signup.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use paymxnts_core::contact::normalize_email;
use paymxnts_core::error::CoreError;
use paymxnts_core::navigation::Route;
use paymxnts_core::verification::{compose_phone, validate_signup, SignupFields};
use paymxnts_db::models::verification::{CreateVerification, VerificationResponse};
use paymxnts_db::VerificationStore;
use paymxnts_events::bus::{WorkflowEvent, EVENT_VERIFICATION_SUBMITTED};
use serde::{Deserialize, Serialize};

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /signup`. Missing fields count as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Dial prefix such as `+1`, prepended to `phone` as entered.
    pub country_code: Option<String>,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub accepted_terms: bool,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub request: VerificationResponse,
    pub route: Route,
}

/// POST /api/v1/signup
///
/// Validate the form, hash the password, and file a pending verification
/// request. Nothing is written when validation fails.
pub async fn submit_signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SignupResponse>>)> {
    validate_signup(&SignupFields {
        first_name: &input.first_name,
        last_name: &input.last_name,
        email: &input.email,
        phone: &input.phone,
        password: &input.password,
        confirm_password: &input.confirm_password,
        accepted_terms: input.accepted_terms,
    })
    .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let request = state
        .store
        .create_verification(&CreateVerification {
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: normalize_email(&input.email),
            phone: compose_phone(input.country_code.as_deref(), &input.phone),
            password_hash,
        })
        .await?;

    tracing::info!(request_id = request.id, "Verification request submitted");
    state.event_bus.publish(
        WorkflowEvent::new(EVENT_VERIFICATION_SUBMITTED)
            .with_source("agent_verification", request.id),
    );

    let route = Route::Pending {
        email: request.email.clone(),
    };
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SignupResponse {
                request: request.into(),
                route,
            },
        }),
    ))
}
