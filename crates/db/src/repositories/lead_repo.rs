//! Repository for the `leads` table.

use sqlx::PgPool;
use paymxnts_core::lead::LEAD_STATUS_NEW;
use paymxnts_core::types::DbId;

use crate::models::lead::{CreateLead, Lead};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, business_name, phone, email_address, \
                        zip_code, credit_processing_volume, notes, status, agent_id, \
                        agent_name, agent_email, created_at";

pub struct LeadRepo;

impl LeadRepo {
    /// Insert a lead with status `new`, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateLead) -> Result<Lead, sqlx::Error> {
        let query = format!(
            "INSERT INTO leads
                (first_name, last_name, business_name, phone, email_address, zip_code,
                 credit_processing_volume, notes, status, agent_id, agent_name, agent_email)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.business_name)
            .bind(&input.phone)
            .bind(&input.email_address)
            .bind(&input.zip_code)
            .bind(&input.credit_processing_volume)
            .bind(&input.notes)
            .bind(LEAD_STATUS_NEW)
            .bind(input.agent_id)
            .bind(&input.agent_name)
            .bind(&input.agent_email)
            .fetch_one(pool)
            .await
    }

    /// List one agent's leads, newest first.
    pub async fn list_for_agent(pool: &PgPool, agent_id: DbId) -> Result<Vec<Lead>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM leads
             WHERE agent_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(agent_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE id = $1");
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
