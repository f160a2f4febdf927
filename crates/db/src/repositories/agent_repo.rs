//! Repository for the `agents` table.
//!
//! Agents are inserted only by [`super::VerificationRepo::approve`].

use sqlx::PgPool;
use paymxnts_core::agent::AGENT_STATUS_ACTIVE;
use paymxnts_core::types::DbId;

use crate::models::agent::Agent;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, first_name, last_name, email, phone, password_hash, \
                                  role, status, created_at, approved_at, approved_by, last_login_at";

pub struct AgentRepo;

impl AgentRepo {
    /// Find an agent by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Agent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM agents WHERE id = $1");
        sqlx::query_as::<_, Agent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active agent by normalized email.
    pub async fn find_active_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Agent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM agents WHERE email = $1 AND status = $2");
        sqlx::query_as::<_, Agent>(&query)
            .bind(email)
            .bind(AGENT_STATUS_ACTIVE)
            .fetch_optional(pool)
            .await
    }

    /// Set `last_login_at` to now.
    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE agents SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
