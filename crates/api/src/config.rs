use paymxnts_core::admin::AdminAllowList;
use paymxnts_core::contact::normalize_email;

use crate::auth::jwt::JwtConfig;

/// Which [`Store`](paymxnts_db::Store) implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL via `DATABASE_URL` (default).
    Postgres,
    /// Process-local store; data is lost on restart.
    Memory,
}

impl StorageBackend {
    /// Parse the `STORAGE_BACKEND` value (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Credentials used to seed an admin account at startup.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Who may act as an admin.
#[derive(Debug, Clone, Default)]
pub struct AdminConfig {
    /// Emails allowed to sign in through the identity provider and to call
    /// `/admin/*` routes.
    pub allow_list: AdminAllowList,
    /// Admin account to create (or re-key) on startup.
    pub bootstrap: Option<AdminBootstrap>,
}

impl AdminConfig {
    /// Load admin configuration from environment variables.
    ///
    /// | Env Var                    | Default |
    /// |----------------------------|---------|
    /// | `ADMIN_EMAILS`             | empty   |
    /// | `ADMIN_BOOTSTRAP_EMAIL`    | unset   |
    /// | `ADMIN_BOOTSTRAP_PASSWORD` | unset   |
    ///
    /// The bootstrap email is added to the allow-list so a fresh deployment
    /// always has one usable admin.
    pub fn from_env() -> Self {
        let mut emails: Vec<String> = std::env::var("ADMIN_EMAILS")
            .unwrap_or_default()
            .split(',')
            .map(str::to_string)
            .collect();

        let bootstrap = match (
            std::env::var("ADMIN_BOOTSTRAP_EMAIL"),
            std::env::var("ADMIN_BOOTSTRAP_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.trim().is_empty() && !password.is_empty() => {
                let email = normalize_email(&email);
                emails.push(email.clone());
                Some(AdminBootstrap { email, password })
            }
            _ => None,
        };

        Self {
            allow_list: AdminAllowList::new(emails),
            bootstrap,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development
/// except `JWT_SECRET`, which must always be provided.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
    pub storage: StorageBackend,
    /// Mailbox that receives every new lead (requires SMTP).
    pub lead_notify_email: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `STORAGE_BACKEND`       | `postgres`                 |
    /// | `LEAD_NOTIFY_EMAIL`     | unset                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let storage = std::env::var("STORAGE_BACKEND")
            .map(|v| {
                StorageBackend::parse(&v)
                    .unwrap_or_else(|| panic!("STORAGE_BACKEND must be 'postgres' or 'memory', got '{v}'"))
            })
            .unwrap_or(StorageBackend::Postgres);

        let lead_notify_email = std::env::var("LEAD_NOTIFY_EMAIL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            admin: AdminConfig::from_env(),
            storage,
            lead_notify_email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_backend_parsing() {
        assert_eq!(StorageBackend::parse("postgres"), Some(StorageBackend::Postgres));
        assert_eq!(StorageBackend::parse(" Memory "), Some(StorageBackend::Memory));
        assert_eq!(StorageBackend::parse("sqlite"), None);
    }

    #[test]
    fn bootstrap_debug_hides_password() {
        let bootstrap = AdminBootstrap {
            email: "boss@paymxnts.com".into(),
            password: "hunter2".into(),
        };
        let rendered = format!("{bootstrap:?}");
        assert!(rendered.contains("boss@paymxnts.com"));
        assert!(!rendered.contains("hunter2"));
    }
}
