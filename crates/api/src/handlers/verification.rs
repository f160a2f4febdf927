//! Admin review of pending agent verification requests.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use paymxnts_core::types::DbId;
use paymxnts_db::models::agent::AgentResponse;
use paymxnts_db::models::verification::VerificationResponse;
use paymxnts_db::VerificationStore;
use paymxnts_events::bus::{
    WorkflowEvent, EVENT_VERIFICATION_APPROVED, EVENT_VERIFICATION_REJECTED,
};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/verifications
///
/// Snapshot of the pending queue, oldest first.
pub async fn list_pending(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<VerificationResponse>>>> {
    let pending = state.store.list_pending_verifications().await?;
    Ok(Json(DataResponse {
        data: pending.into_iter().map(VerificationResponse::from).collect(),
    }))
}

/// POST /api/v1/admin/verifications/{id}/approve
///
/// Creates the agent and removes the request atomically. A request that is
/// already gone yields 404; an email that already has an agent yields 409.
pub async fn approve(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<AgentResponse>>)> {
    let agent = state.store.approve_verification(id, admin.id).await?;

    tracing::info!(
        request_id = id,
        agent_id = agent.id,
        reviewer_id = admin.id,
        "Verification approved"
    );
    state.event_bus.publish(
        WorkflowEvent::new(EVENT_VERIFICATION_APPROVED)
            .with_source("agent_verification", id)
            .with_actor(admin.id)
            .with_payload(serde_json::json!({ "agent_id": agent.id })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: agent.into() })))
}

/// POST /api/v1/admin/verifications/{id}/reject
///
/// Deletes the pending request. No agent is created and no rejected row is
/// kept; the decision is recorded in the log and on the event bus.
pub async fn reject(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.store.reject_verification(id).await?;

    tracing::info!(request_id = id, reviewer_id = admin.id, "Verification rejected");
    state.event_bus.publish(
        WorkflowEvent::new(EVENT_VERIFICATION_REJECTED)
            .with_source("agent_verification", id)
            .with_actor(admin.id),
    );

    Ok(StatusCode::NO_CONTENT)
}
