//! Admin account model (identity provider credentials).

use sqlx::FromRow;
use paymxnts_core::types::{DbId, Timestamp};

/// Full row from the `admin_accounts` table.
#[derive(Debug, Clone, FromRow)]
pub struct AdminAccount {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl AdminAccount {
    /// Whether a throttling lock is still in force at `now`.
    pub fn is_locked(&self, now: Timestamp) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }
}
