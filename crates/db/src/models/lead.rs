//! Lead entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use paymxnts_core::lead_export::LeadExport;
use paymxnts_core::types::{DbId, Timestamp};

/// A row from the `leads` table. Leads are immutable once written.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Lead {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub business_name: String,
    pub phone: String,
    pub email_address: String,
    pub zip_code: String,
    pub credit_processing_volume: String,
    pub notes: String,
    pub status: String,
    pub agent_id: DbId,
    pub agent_name: String,
    pub agent_email: String,
    pub created_at: Timestamp,
}

impl Lead {
    /// Borrowed view used by the CSV and email formatters.
    pub fn export(&self) -> LeadExport<'_> {
        LeadExport {
            first_name: &self.first_name,
            last_name: &self.last_name,
            business_name: &self.business_name,
            phone: &self.phone,
            email_address: &self.email_address,
            zip_code: &self.zip_code,
            credit_processing_volume: &self.credit_processing_volume,
            notes: &self.notes,
            agent_name: &self.agent_name,
            agent_email: &self.agent_email,
            submitted_at: self.created_at,
        }
    }
}

/// DTO for inserting a lead. Text fields are already trimmed; `created_at`
/// and `status` are assigned by the store.
#[derive(Debug, Clone)]
pub struct CreateLead {
    pub first_name: String,
    pub last_name: String,
    pub business_name: String,
    pub phone: String,
    pub email_address: String,
    pub zip_code: String,
    pub credit_processing_volume: String,
    pub notes: String,
    pub agent_id: DbId,
    pub agent_name: String,
    pub agent_email: String,
}
