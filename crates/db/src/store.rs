//! Storage traits consumed by the API layer.
//!
//! Each trait covers one table. Method names are unique across traits so a
//! `dyn Store` can call any of them without disambiguation.

use async_trait::async_trait;
use paymxnts_core::types::{DbId, Timestamp};

use crate::error::StoreError;
use crate::models::admin::AdminAccount;
use crate::models::agent::Agent;
use crate::models::lead::{CreateLead, Lead};
use crate::models::session::{CreateSession, Session};
use crate::models::verification::{AgentVerification, CreateVerification};
use crate::repositories::{AdminAccountRepo, AgentRepo, LeadRepo, SessionRepo, VerificationRepo};
use crate::DbPool;

#[async_trait]
pub trait VerificationStore: Send + Sync {
    async fn create_verification(
        &self,
        input: &CreateVerification,
    ) -> Result<AgentVerification, StoreError>;

    /// Pending requests, oldest first.
    async fn list_pending_verifications(&self) -> Result<Vec<AgentVerification>, StoreError>;

    /// Atomically create the agent and remove the request.
    ///
    /// `NotFound` when the request is not pending; `Conflict` when an agent
    /// with the same email already exists.
    async fn approve_verification(&self, id: DbId, reviewer_id: DbId)
        -> Result<Agent, StoreError>;

    /// Remove a pending request. `NotFound` when it is not pending.
    async fn reject_verification(&self, id: DbId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait AgentStore: Send + Sync {
    async fn find_agent(&self, id: DbId) -> Result<Option<Agent>, StoreError>;

    async fn find_active_agent_by_email(&self, email: &str) -> Result<Option<Agent>, StoreError>;

    async fn record_agent_login(&self, id: DbId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn create_lead(&self, input: &CreateLead) -> Result<Lead, StoreError>;

    /// One agent's leads, newest first.
    async fn list_leads_for_agent(&self, agent_id: DbId) -> Result<Vec<Lead>, StoreError>;

    async fn find_lead(&self, id: DbId) -> Result<Option<Lead>, StoreError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, input: &CreateSession) -> Result<Session, StoreError>;

    /// Not revoked and not expired.
    async fn find_live_session(&self, id: DbId) -> Result<Option<Session>, StoreError>;

    /// Live session owning the given refresh token hash.
    async fn find_session_by_refresh_hash(&self, hash: &str)
        -> Result<Option<Session>, StoreError>;

    async fn revoke_session(&self, id: DbId) -> Result<bool, StoreError>;

    async fn revoke_sessions_for_principal(
        &self,
        kind: &str,
        principal_id: DbId,
    ) -> Result<u64, StoreError>;

    /// Delete expired or revoked sessions, returning how many were removed.
    async fn purge_dead_sessions(&self) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait AdminAccountStore: Send + Sync {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminAccount>, StoreError>;

    async fn upsert_admin(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<AdminAccount, StoreError>;

    /// Returns the updated failure count.
    async fn record_admin_failed_login(&self, id: DbId) -> Result<i32, StoreError>;

    async fn lock_admin(&self, id: DbId, until: Timestamp) -> Result<(), StoreError>;

    /// Zero the failure counter and clear `locked_until`.
    async fn clear_admin_lock(&self, id: DbId) -> Result<(), StoreError>;

    async fn record_admin_login(&self, id: DbId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Confirm the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Everything the API needs from persistence.
pub trait Store:
    VerificationStore + AgentStore + LeadStore + SessionStore + AdminAccountStore + StoreHealth
{
}

impl<T> Store for T where
    T: VerificationStore
        + AgentStore
        + LeadStore
        + SessionStore
        + AdminAccountStore
        + StoreHealth
{
}

/// Postgres-backed [`Store`] delegating to the repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

#[async_trait]
impl VerificationStore for PgStore {
    async fn create_verification(
        &self,
        input: &CreateVerification,
    ) -> Result<AgentVerification, StoreError> {
        Ok(VerificationRepo::create(&self.pool, input).await?)
    }

    async fn list_pending_verifications(&self) -> Result<Vec<AgentVerification>, StoreError> {
        Ok(VerificationRepo::list_pending(&self.pool).await?)
    }

    async fn approve_verification(
        &self,
        id: DbId,
        reviewer_id: DbId,
    ) -> Result<Agent, StoreError> {
        VerificationRepo::approve(&self.pool, id, reviewer_id)
            .await
            .map_err(StoreError::from_unique_violation)?
            .ok_or(StoreError::NotFound {
                entity: "AgentVerification",
                id,
            })
    }

    async fn reject_verification(&self, id: DbId) -> Result<(), StoreError> {
        if VerificationRepo::reject(&self.pool, id).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                entity: "AgentVerification",
                id,
            })
        }
    }
}

#[async_trait]
impl AgentStore for PgStore {
    async fn find_agent(&self, id: DbId) -> Result<Option<Agent>, StoreError> {
        Ok(AgentRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_active_agent_by_email(&self, email: &str) -> Result<Option<Agent>, StoreError> {
        Ok(AgentRepo::find_active_by_email(&self.pool, email).await?)
    }

    async fn record_agent_login(&self, id: DbId) -> Result<(), StoreError> {
        Ok(AgentRepo::record_login(&self.pool, id).await?)
    }
}

#[async_trait]
impl LeadStore for PgStore {
    async fn create_lead(&self, input: &CreateLead) -> Result<Lead, StoreError> {
        Ok(LeadRepo::create(&self.pool, input).await?)
    }

    async fn list_leads_for_agent(&self, agent_id: DbId) -> Result<Vec<Lead>, StoreError> {
        Ok(LeadRepo::list_for_agent(&self.pool, agent_id).await?)
    }

    async fn find_lead(&self, id: DbId) -> Result<Option<Lead>, StoreError> {
        Ok(LeadRepo::find_by_id(&self.pool, id).await?)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn create_session(&self, input: &CreateSession) -> Result<Session, StoreError> {
        Ok(SessionRepo::create(&self.pool, input).await?)
    }

    async fn find_live_session(&self, id: DbId) -> Result<Option<Session>, StoreError> {
        Ok(SessionRepo::find_live(&self.pool, id).await?)
    }

    async fn find_session_by_refresh_hash(
        &self,
        hash: &str,
    ) -> Result<Option<Session>, StoreError> {
        Ok(SessionRepo::find_by_refresh_token_hash(&self.pool, hash).await?)
    }

    async fn revoke_session(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(SessionRepo::revoke(&self.pool, id).await?)
    }

    async fn revoke_sessions_for_principal(
        &self,
        kind: &str,
        principal_id: DbId,
    ) -> Result<u64, StoreError> {
        Ok(SessionRepo::revoke_all_for_principal(&self.pool, kind, principal_id).await?)
    }

    async fn purge_dead_sessions(&self) -> Result<u64, StoreError> {
        Ok(SessionRepo::cleanup_expired(&self.pool).await?)
    }
}

#[async_trait]
impl AdminAccountStore for PgStore {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminAccount>, StoreError> {
        Ok(AdminAccountRepo::find_by_email(&self.pool, email).await?)
    }

    async fn upsert_admin(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<AdminAccount, StoreError> {
        Ok(AdminAccountRepo::upsert(&self.pool, email, password_hash).await?)
    }

    async fn record_admin_failed_login(&self, id: DbId) -> Result<i32, StoreError> {
        Ok(AdminAccountRepo::increment_failed_login(&self.pool, id).await?)
    }

    async fn lock_admin(&self, id: DbId, until: Timestamp) -> Result<(), StoreError> {
        Ok(AdminAccountRepo::lock_account(&self.pool, id, until).await?)
    }

    async fn clear_admin_lock(&self, id: DbId) -> Result<(), StoreError> {
        Ok(AdminAccountRepo::clear_lock(&self.pool, id).await?)
    }

    async fn record_admin_login(&self, id: DbId) -> Result<(), StoreError> {
        Ok(AdminAccountRepo::record_successful_login(&self.pool, id).await?)
    }
}
