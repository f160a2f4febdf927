//! Agent verification request model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use paymxnts_core::types::{DbId, Timestamp};

/// Full row from the `agent_verifications` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`VerificationResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct AgentVerification {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub status: String,
    pub created_at: Timestamp,
}

/// Safe verification request representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationResponse {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub created_at: Timestamp,
}

impl From<AgentVerification> for VerificationResponse {
    fn from(row: AgentVerification) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// DTO for creating a pending verification request.
#[derive(Debug, Clone)]
pub struct CreateVerification {
    pub first_name: String,
    pub last_name: String,
    /// Already normalized (trimmed, lowercased).
    pub email: String,
    pub phone: String,
    pub password_hash: String,
}
