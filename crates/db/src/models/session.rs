//! Principal session model and DTOs.

use sqlx::FromRow;
use paymxnts_core::types::{DbId, Timestamp};

/// A session row from the `sessions` table.
///
/// `principal_kind` is the role name (`"agent"` or `"admin"`) and selects
/// which table `principal_id` points into.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub principal_kind: String,
    pub principal_id: DbId,
    pub email: String,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
}

impl Session {
    /// Not revoked and not yet expired at `now`.
    pub fn is_live(&self, now: Timestamp) -> bool {
        !self.is_revoked && self.expires_at > now
    }
}

/// DTO for creating a new session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub principal_kind: String,
    pub principal_id: DbId,
    pub email: String,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
