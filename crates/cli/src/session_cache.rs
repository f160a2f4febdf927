//! On-disk session cache.
//!
//! One JSON file holds the tokens of the last successful login so later
//! invocations can resume without asking for credentials again.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::client::{AuthTokens, Principal};

const CACHE_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedSession {
    pub access_token: String,
    pub refresh_token: String,
    pub principal: Principal,
}

impl From<AuthTokens> for CachedSession {
    fn from(tokens: AuthTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            principal: tokens.principal,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$PAYMXNTS_HOME/session.json`, or `<config dir>/paymxnts/session.json`.
    pub fn default_location() -> Result<Self> {
        let dir = match std::env::var_os("PAYMXNTS_HOME") {
            Some(home) => PathBuf::from(home),
            None => dirs_next::config_dir()
                .context("Could not determine a config directory; set PAYMXNTS_HOME")?
                .join("paymxnts"),
        };
        Ok(Self::new(dir.join(CACHE_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached session, or `None` when nothing usable is stored.
    ///
    /// An unreadable or corrupt file counts as no session.
    pub fn load(&self) -> Result<Option<CachedSession>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring corrupt session cache");
                Ok(None)
            }
        }
    }

    pub fn store(&self, session: &CachedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(session).context("Failed to encode session")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to restrict {}", self.path.display()))?;
        }
        Ok(())
    }

    /// Remove the cache file. Missing files are fine.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}
