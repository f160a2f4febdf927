//! Identity provider for admin sign-in.
//!
//! Admin credentials live outside the agent tables. The login handler only
//! asks an [`IdentityProvider`] whether an allow-listed email and password
//! are good, and maps the provider's error codes to user-facing messages.
//! [`StoreIdentityProvider`] implements the provider over the
//! `admin_accounts` table, including the failed-attempt lockout.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use paymxnts_core::login::{IdentityErrorCode, LOCK_DURATION_MINS, MAX_FAILED_ATTEMPTS};
use paymxnts_core::types::DbId;
use paymxnts_db::{AdminAccountStore, Store};

use crate::auth::password::verify_password;

/// An admin confirmed by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub id: DbId,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid credential")]
    InvalidCredential,

    #[error("too many failed attempts")]
    TooManyRequests,

    #[error("identity backend unavailable: {0}")]
    NetworkRequestFailed(String),
}

impl IdentityError {
    pub fn code(&self) -> IdentityErrorCode {
        match self {
            IdentityError::InvalidCredential => IdentityErrorCode::InvalidCredential,
            IdentityError::TooManyRequests => IdentityErrorCode::TooManyRequests,
            IdentityError::NetworkRequestFailed(_) => IdentityErrorCode::NetworkRequestFailed,
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Check an email and password. `email` is already normalized.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AdminIdentity, IdentityError>;
}

/// [`IdentityProvider`] backed by the `admin_accounts` table.
///
/// [`MAX_FAILED_ATTEMPTS`] consecutive failures lock the account for
/// [`LOCK_DURATION_MINS`]; the failure that reaches the limit already
/// answers `TooManyRequests`. A successful sign-in or an expired lock resets
/// the counter.
pub struct StoreIdentityProvider {
    store: Arc<dyn Store>,
}

impl StoreIdentityProvider {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

fn backend_error(err: impl std::fmt::Display) -> IdentityError {
    IdentityError::NetworkRequestFailed(err.to_string())
}

#[async_trait]
impl IdentityProvider for StoreIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AdminIdentity, IdentityError> {
        let account = self
            .store
            .find_admin_by_email(email)
            .await
            .map_err(backend_error)?
            .ok_or(IdentityError::InvalidCredential)?;

        let now = Utc::now();
        if account.is_locked(now) {
            return Err(IdentityError::TooManyRequests);
        }
        if account.locked_until.is_some() {
            // The lock has run out; counting starts again from zero.
            self.store
                .clear_admin_lock(account.id)
                .await
                .map_err(backend_error)?;
        }

        let valid = verify_password(password, &account.password_hash).map_err(backend_error)?;

        if !valid {
            let failures = self
                .store
                .record_admin_failed_login(account.id)
                .await
                .map_err(backend_error)?;
            if failures >= MAX_FAILED_ATTEMPTS {
                let until = now + chrono::Duration::minutes(LOCK_DURATION_MINS);
                self.store
                    .lock_admin(account.id, until)
                    .await
                    .map_err(backend_error)?;
                tracing::warn!(admin_id = account.id, failures, %until, "Admin account locked");
                return Err(IdentityError::TooManyRequests);
            }
            return Err(IdentityError::InvalidCredential);
        }

        self.store
            .record_admin_login(account.id)
            .await
            .map_err(backend_error)?;

        Ok(AdminIdentity {
            id: account.id,
            email: account.email,
        })
    }
}
