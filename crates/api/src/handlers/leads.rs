//! Lead capture, listing, and CSV export for agents.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use paymxnts_core::error::CoreError;
use paymxnts_core::lead::{summarize, validate_lead, LeadFields};
use paymxnts_core::lead_export;
use paymxnts_core::types::DbId;
use paymxnts_db::models::lead::{CreateLead, Lead};
use paymxnts_db::{AgentStore, LeadStore, SessionStore};
use paymxnts_events::bus::{WorkflowEvent, EVENT_LEAD_CREATED};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAgent;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /leads`. Missing fields count as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateLeadRequest {
    pub first_name: String,
    pub last_name: String,
    pub business_name: String,
    pub phone: String,
    pub email_address: String,
    pub zip_code: String,
    pub credit_processing_volume: String,
    pub notes: String,
}

/// Body of `GET /leads`.
#[derive(Debug, Serialize)]
pub struct LeadList {
    pub leads: Vec<Lead>,
    pub total: usize,
    pub new_count: usize,
}

/// POST /api/v1/leads
///
/// Validate and store a lead authored by the calling agent.
pub async fn create_lead(
    State(state): State<AppState>,
    RequireAgent(user): RequireAgent,
    Json(input): Json<CreateLeadRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Lead>>)> {
    validate_lead(&LeadFields {
        first_name: &input.first_name,
        last_name: &input.last_name,
        business_name: &input.business_name,
        phone: &input.phone,
        email_address: &input.email_address,
        credit_processing_volume: &input.credit_processing_volume,
    })
    .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let Some(agent) = state.store.find_agent(user.id).await? else {
        state.store.revoke_session(user.session_id).await?;
        return Err(AppError::Core(CoreError::Unauthorized(
            "Account no longer exists. Please log in again.".into(),
        )));
    };

    let lead = state
        .store
        .create_lead(&CreateLead {
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            business_name: input.business_name.trim().to_string(),
            phone: input.phone.trim().to_string(),
            email_address: input.email_address.trim().to_string(),
            zip_code: input.zip_code.trim().to_string(),
            credit_processing_volume: input.credit_processing_volume.trim().to_string(),
            notes: input.notes.trim().to_string(),
            agent_id: agent.id,
            agent_name: agent.full_name(),
            agent_email: agent.email.clone(),
        })
        .await?;

    tracing::info!(lead_id = lead.id, agent_id = agent.id, "Lead created");
    match serde_json::to_value(&lead) {
        Ok(payload) => state.event_bus.publish(
            WorkflowEvent::new(EVENT_LEAD_CREATED)
                .with_source("lead", lead.id)
                .with_actor(agent.id)
                .with_payload(payload),
        ),
        Err(e) => tracing::error!(error = %e, lead_id = lead.id, "Failed to encode lead event"),
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: lead })))
}

/// GET /api/v1/leads
///
/// The calling agent's leads, newest first, with counters.
pub async fn list_leads(
    State(state): State<AppState>,
    RequireAgent(user): RequireAgent,
) -> AppResult<Json<DataResponse<LeadList>>> {
    let leads = state.store.list_leads_for_agent(user.id).await?;
    let summary = summarize(leads.iter().map(|lead| lead.status.as_str()));

    Ok(Json(DataResponse {
        data: LeadList {
            leads,
            total: summary.total,
            new_count: summary.new_count,
        },
    }))
}

/// GET /api/v1/leads/{id}/export
///
/// The lead as a CSV attachment. Leads written by other agents are reported
/// as not found.
pub async fn export_lead(
    State(state): State<AppState>,
    RequireAgent(user): RequireAgent,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let lead = state
        .store
        .find_lead(id)
        .await?
        .filter(|lead| lead.agent_id == user.id)
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Lead", id }))?;

    let export = lead.export();
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                lead_export::export_file_name(&export)
            ),
        ),
    ];
    Ok((headers, lead_export::to_csv(&export)))
}
