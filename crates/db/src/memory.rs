//! In-process [`Store`](crate::Store) used by tests and `STORAGE_BACKEND=memory`.
//!
//! All tables live behind one lock so multi-table operations (approval)
//! are atomic, matching the Postgres transaction.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use paymxnts_core::agent::AGENT_STATUS_ACTIVE;
use paymxnts_core::lead::LEAD_STATUS_NEW;
use paymxnts_core::roles::ROLE_AGENT;
use paymxnts_core::types::{DbId, Timestamp};
use paymxnts_core::verification::VERIFICATION_PENDING;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::admin::AdminAccount;
use crate::models::agent::Agent;
use crate::models::lead::{CreateLead, Lead};
use crate::models::session::{CreateSession, Session};
use crate::models::verification::{AgentVerification, CreateVerification};
use crate::store::{
    AdminAccountStore, AgentStore, LeadStore, SessionStore, StoreHealth, VerificationStore,
};

#[derive(Default)]
struct Tables {
    next_id: DbId,
    verifications: Vec<AgentVerification>,
    agents: Vec<Agent>,
    leads: Vec<Lead>,
    sessions: Vec<Session>,
    admins: Vec<AdminAccount>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl VerificationStore for MemoryStore {
    async fn create_verification(
        &self,
        input: &CreateVerification,
    ) -> Result<AgentVerification, StoreError> {
        let mut tables = self.tables.write().await;
        let row = AgentVerification {
            id: tables.next_id(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            password_hash: input.password_hash.clone(),
            status: VERIFICATION_PENDING.to_string(),
            created_at: Utc::now(),
        };
        tables.verifications.push(row.clone());
        Ok(row)
    }

    async fn list_pending_verifications(&self) -> Result<Vec<AgentVerification>, StoreError> {
        let tables = self.tables.read().await;
        let mut pending: Vec<_> = tables
            .verifications
            .iter()
            .filter(|v| v.status == VERIFICATION_PENDING)
            .cloned()
            .collect();
        pending.sort_by_key(|v| (v.created_at, v.id));
        Ok(pending)
    }

    async fn approve_verification(
        &self,
        id: DbId,
        reviewer_id: DbId,
    ) -> Result<Agent, StoreError> {
        let mut tables = self.tables.write().await;
        let not_found = StoreError::NotFound {
            entity: "AgentVerification",
            id,
        };
        let Some(index) = tables
            .verifications
            .iter()
            .position(|v| v.id == id && v.status == VERIFICATION_PENDING)
        else {
            return Err(not_found);
        };

        let email = tables.verifications[index].email.clone();
        if tables.agents.iter().any(|a| a.email == email) {
            return Err(StoreError::Conflict("uq_agents_email".to_string()));
        }

        let request = tables.verifications.remove(index);
        let now = Utc::now();
        let agent = Agent {
            id: tables.next_id(),
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            password_hash: request.password_hash,
            role: ROLE_AGENT.to_string(),
            status: AGENT_STATUS_ACTIVE.to_string(),
            created_at: now,
            approved_at: now,
            approved_by: reviewer_id,
            last_login_at: None,
        };
        tables.agents.push(agent.clone());
        Ok(agent)
    }

    async fn reject_verification(&self, id: DbId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.verifications.len();
        tables
            .verifications
            .retain(|v| !(v.id == id && v.status == VERIFICATION_PENDING));
        if tables.verifications.len() < before {
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
impl AgentStore for MemoryStore {
    async fn find_agent(&self, id: DbId) -> Result<Option<Agent>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.agents.iter().find(|a| a.id == id).cloned())
    }

    async fn find_active_agent_by_email(&self, email: &str) -> Result<Option<Agent>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .agents
            .iter()
            .find(|a| a.email == email && a.status == AGENT_STATUS_ACTIVE)
            .cloned())
    }

    async fn record_agent_login(&self, id: DbId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(agent) = tables.agents.iter_mut().find(|a| a.id == id) {
            agent.last_login_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[async_trait]
impl LeadStore for MemoryStore {
    async fn create_lead(&self, input: &CreateLead) -> Result<Lead, StoreError> {
        let mut tables = self.tables.write().await;
        let lead = Lead {
            id: tables.next_id(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            business_name: input.business_name.clone(),
            phone: input.phone.clone(),
            email_address: input.email_address.clone(),
            zip_code: input.zip_code.clone(),
            credit_processing_volume: input.credit_processing_volume.clone(),
            notes: input.notes.clone(),
            status: LEAD_STATUS_NEW.to_string(),
            agent_id: input.agent_id,
            agent_name: input.agent_name.clone(),
            agent_email: input.agent_email.clone(),
            created_at: Utc::now(),
        };
        tables.leads.push(lead.clone());
        Ok(lead)
    }

    async fn list_leads_for_agent(&self, agent_id: DbId) -> Result<Vec<Lead>, StoreError> {
        let tables = self.tables.read().await;
        let mut leads: Vec<_> = tables
            .leads
            .iter()
            .filter(|l| l.agent_id == agent_id)
            .cloned()
            .collect();
        leads.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(leads)
    }

    async fn find_lead(&self, id: DbId) -> Result<Option<Lead>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.leads.iter().find(|l| l.id == id).cloned())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, input: &CreateSession) -> Result<Session, StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .sessions
            .iter()
            .any(|s| s.refresh_token_hash == input.refresh_token_hash)
        {
            return Err(StoreError::Conflict(
                "uq_sessions_refresh_token_hash".to_string(),
            ));
        }
        let session = Session {
            id: tables.next_id(),
            principal_kind: input.principal_kind.clone(),
            principal_id: input.principal_id,
            email: input.email.clone(),
            refresh_token_hash: input.refresh_token_hash.clone(),
            expires_at: input.expires_at,
            is_revoked: false,
            created_at: Utc::now(),
        };
        tables.sessions.push(session.clone());
        Ok(session)
    }

    async fn find_live_session(&self, id: DbId) -> Result<Option<Session>, StoreError> {
        let tables = self.tables.read().await;
        let now = Utc::now();
        Ok(tables
            .sessions
            .iter()
            .find(|s| s.id == id && s.is_live(now))
            .cloned())
    }

    async fn find_session_by_refresh_hash(
        &self,
        hash: &str,
    ) -> Result<Option<Session>, StoreError> {
        let tables = self.tables.read().await;
        let now = Utc::now();
        Ok(tables
            .sessions
            .iter()
            .find(|s| s.refresh_token_hash == hash && s.is_live(now))
            .cloned())
    }

    async fn revoke_session(&self, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables
            .sessions
            .iter_mut()
            .find(|s| s.id == id && !s.is_revoked)
        {
            Some(session) => {
                session.is_revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_sessions_for_principal(
        &self,
        kind: &str,
        principal_id: DbId,
    ) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let mut revoked = 0;
        for session in tables.sessions.iter_mut().filter(|s| {
            s.principal_kind == kind && s.principal_id == principal_id && !s.is_revoked
        }) {
            session.is_revoked = true;
            revoked += 1;
        }
        Ok(revoked)
    }

    async fn purge_dead_sessions(&self) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let before = tables.sessions.len();
        tables.sessions.retain(|s| s.is_live(now));
        Ok((before - tables.sessions.len()) as u64)
    }
}

#[async_trait]
impl AdminAccountStore for MemoryStore {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminAccount>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.admins.iter().find(|a| a.email == email).cloned())
    }

    async fn upsert_admin(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<AdminAccount, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.admins.iter_mut().find(|a| a.email == email) {
            existing.password_hash = password_hash.to_string();
            return Ok(existing.clone());
        }
        let admin = AdminAccount {
            id: tables.next_id(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            failed_login_count: 0,
            locked_until: None,
            last_login_at: None,
            created_at: Utc::now(),
        };
        tables.admins.push(admin.clone());
        Ok(admin)
    }

    async fn record_admin_failed_login(&self, id: DbId) -> Result<i32, StoreError> {
        let mut tables = self.tables.write().await;
        let admin = tables
            .admins
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound {
                entity: "AdminAccount",
                id,
            })?;
        admin.failed_login_count += 1;
        Ok(admin.failed_login_count)
    }

    async fn lock_admin(&self, id: DbId, until: Timestamp) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(admin) = tables.admins.iter_mut().find(|a| a.id == id) {
            admin.locked_until = Some(until);
        }
        Ok(())
    }

    async fn clear_admin_lock(&self, id: DbId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(admin) = tables.admins.iter_mut().find(|a| a.id == id) {
            admin.failed_login_count = 0;
            admin.locked_until = None;
        }
        Ok(())
    }

    async fn record_admin_login(&self, id: DbId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(admin) = tables.admins.iter_mut().find(|a| a.id == id) {
            admin.failed_login_count = 0;
            admin.locked_until = None;
            admin.last_login_at = Some(Utc::now());
        }
        Ok(())
    }
}
