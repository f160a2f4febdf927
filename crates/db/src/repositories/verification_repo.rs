//! Repository for the `agent_verifications` table.
//!
//! Approval and rejection are the only ways a pending row leaves the table.
//! Both are single atomic operations so two admins acting on the same
//! request cannot both succeed.

use sqlx::PgPool;
use paymxnts_core::agent::AGENT_STATUS_ACTIVE;
use paymxnts_core::roles::ROLE_AGENT;
use paymxnts_core::types::DbId;
use paymxnts_core::verification::VERIFICATION_PENDING;

use crate::models::agent::Agent;
use crate::models::verification::{AgentVerification, CreateVerification};
use crate::repositories::agent_repo::COLUMNS as AGENT_COLUMNS;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, email, phone, password_hash, status, created_at";

/// Provides operations for agent verification requests.
pub struct VerificationRepo;

impl VerificationRepo {
    /// Insert a new pending request, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateVerification,
    ) -> Result<AgentVerification, sqlx::Error> {
        let query = format!(
            "INSERT INTO agent_verifications
                (first_name, last_name, email, phone, password_hash, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AgentVerification>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.password_hash)
            .bind(VERIFICATION_PENDING)
            .fetch_one(pool)
            .await
    }

    /// List pending requests, oldest first.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<AgentVerification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM agent_verifications
             WHERE status = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, AgentVerification>(&query)
            .bind(VERIFICATION_PENDING)
            .fetch_all(pool)
            .await
    }

    /// Promote a pending request to an agent and remove the request, in one
    /// transaction.
    ///
    /// Returns `Ok(None)` if no pending request with `id` exists (including
    /// when another approval or rejection got there first). A duplicate agent
    /// email surfaces as the `uq_agents_email` unique violation and rolls the
    /// whole operation back.
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
        reviewer_id: DbId,
    ) -> Result<Option<Agent>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!(
            "SELECT {COLUMNS} FROM agent_verifications
             WHERE id = $1 AND status = $2
             FOR UPDATE"
        );
        let Some(request) = sqlx::query_as::<_, AgentVerification>(&select)
            .bind(id)
            .bind(VERIFICATION_PENDING)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let insert = format!(
            "INSERT INTO agents
                (first_name, last_name, email, phone, password_hash, role, status, approved_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {AGENT_COLUMNS}"
        );
        let agent = sqlx::query_as::<_, Agent>(&insert)
            .bind(&request.first_name)
            .bind(&request.last_name)
            .bind(&request.email)
            .bind(&request.phone)
            .bind(&request.password_hash)
            .bind(ROLE_AGENT)
            .bind(AGENT_STATUS_ACTIVE)
            .bind(reviewer_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM agent_verifications WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(agent))
    }

    /// Remove a pending request without creating an agent.
    ///
    /// Returns `true` if a pending row was deleted.
    pub async fn reject(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM agent_verifications WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(VERIFICATION_PENDING)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
