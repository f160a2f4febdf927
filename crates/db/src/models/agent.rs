//! Agent entity model.

use serde::Serialize;
use sqlx::FromRow;
use paymxnts_core::agent::full_name;
use paymxnts_core::types::{DbId, Timestamp};

/// Full row from the `agents` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`AgentResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Agent {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub created_at: Timestamp,
    pub approved_at: Timestamp,
    /// Admin account that approved the agent.
    pub approved_by: DbId,
    pub last_login_at: Option<Timestamp>,
}

impl Agent {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

/// Safe agent representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub status: String,
    pub created_at: Timestamp,
    pub approved_at: Timestamp,
    pub approved_by: DbId,
    pub last_login_at: Option<Timestamp>,
}

impl From<Agent> for AgentResponse {
    fn from(agent: Agent) -> Self {
        Self {
            id: agent.id,
            first_name: agent.first_name,
            last_name: agent.last_name,
            email: agent.email,
            phone: agent.phone,
            role: agent.role,
            status: agent.status,
            created_at: agent.created_at,
            approved_at: agent.approved_at,
            approved_by: agent.approved_by,
            last_login_at: agent.last_login_at,
        }
    }
}
