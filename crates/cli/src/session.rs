//! Session resume.
//!
//! Every command that needs a signed-in principal starts here. A cached
//! session is checked against the server; an expired access token is
//! refreshed once; a session the server no longer honours is dropped from
//! the cache so the next run starts at the landing screen.

use anyhow::{bail, Result};
use paymxnts_core::navigation::Route;

use crate::client::{ApiClient, ClientError, SessionInfo};
use crate::session_cache::{CachedSession, SessionCache};

#[derive(Debug)]
pub enum Resumed {
    /// No usable session; show the landing screen.
    Landing,
    Active {
        session: CachedSession,
        info: SessionInfo,
    },
}

impl Resumed {
    pub fn route(&self) -> Route {
        match self {
            Resumed::Landing => Route::Landing,
            Resumed::Active { info, .. } => info.route.clone(),
        }
    }
}

/// Resume the cached session.
///
/// No cache means [`Resumed::Landing`] without touching the network. Errors
/// other than 401 are returned as-is and leave the cache alone.
pub async fn resume(client: &ApiClient, cache: &SessionCache) -> Result<Resumed> {
    let Some(session) = cache.load()? else {
        return Ok(Resumed::Landing);
    };

    match client.session(&session.access_token).await {
        Ok(info) => return Ok(Resumed::Active { session, info }),
        Err(e) if e.is_unauthorized() => {
            tracing::debug!(error = %e, "Access token rejected, refreshing");
        }
        Err(e) => return Err(e.into()),
    }

    let refreshed: CachedSession = match client.refresh(&session.refresh_token).await {
        Ok(tokens) => tokens.into(),
        Err(e) if e.is_unauthorized() => return drop_session(cache, &e),
        Err(e) => return Err(e.into()),
    };
    cache.store(&refreshed)?;

    match client.session(&refreshed.access_token).await {
        Ok(info) => Ok(Resumed::Active {
            session: refreshed,
            info,
        }),
        Err(e) if e.is_unauthorized() => drop_session(cache, &e),
        Err(e) => Err(e.into()),
    }
}

fn drop_session(cache: &SessionCache, reason: &ClientError) -> Result<Resumed> {
    tracing::info!(reason = %reason, "Cached session is no longer valid, clearing it");
    cache.clear()?;
    Ok(Resumed::Landing)
}

/// Resume and insist on a signed-in principal, optionally of one role.
pub async fn require(
    client: &ApiClient,
    cache: &SessionCache,
    role: Option<&str>,
) -> Result<CachedSession> {
    match resume(client, cache).await? {
        Resumed::Landing => bail!("Not logged in. Run `paymxnts login` first."),
        Resumed::Active { session, info } => {
            if let Some(role) = role {
                if info.principal.role != role {
                    bail!(
                        "This command needs an {role} login; you are signed in as {} ({}).",
                        info.principal.email,
                        info.principal.role
                    );
                }
            }
            Ok(session)
        }
    }
}
