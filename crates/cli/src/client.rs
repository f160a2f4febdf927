//! HTTP client for the PaymXnts API.

use chrono::{DateTime, Utc};
use paymxnts_core::navigation::Route;
use paymxnts_core::types::DbId;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with an error envelope.
    #[error("{message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if *status == StatusCode::UNAUTHORIZED.as_u16())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
    code: String,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub principal: Principal,
    pub route: Route,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionInfo {
    pub principal: Principal,
    pub session_id: DbId,
    pub route: Route,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub country_code: Option<String>,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub accepted_terms: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Verification {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignupReceipt {
    pub request: Verification,
    pub route: Route,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Agent {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct LeadForm {
    pub first_name: String,
    pub last_name: String,
    pub business_name: String,
    pub phone: String,
    pub email_address: String,
    pub zip_code: String,
    pub credit_processing_volume: String,
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize)]
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
    pub agent_name: String,
    pub agent_email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeadList {
    pub leads: Vec<Lead>,
    pub total: usize,
    pub new_count: usize,
}

/// A downloaded CSV export.
#[derive(Debug, Clone)]
pub struct LeadCsv {
    pub file_name: String,
    pub content: String,
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    /// WebSocket URL of the live pending-verification feed.
    pub fn feed_url(&self, access_token: &str) -> String {
        let ws_base = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.base_url.clone()
        };
        format!("{ws_base}/api/v1/admin/verifications/ws?token={access_token}")
    }

    pub async fn signup(&self, form: &SignupForm) -> Result<SignupReceipt, ClientError> {
        let request = self.http.post(self.url("/signup")).json(form);
        data(send(request).await?).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokens, ClientError> {
        let request = self
            .http
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }));
        Ok(send(request).await?.json().await?)
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, ClientError> {
        let request = self
            .http
            .post(self.url("/auth/refresh"))
            .json(&json!({ "refresh_token": refresh_token }));
        Ok(send(request).await?.json().await?)
    }

    pub async fn session(&self, access_token: &str) -> Result<SessionInfo, ClientError> {
        let request = self.http.get(self.url("/auth/session")).bearer_auth(access_token);
        data(send(request).await?).await
    }

    pub async fn logout(&self, access_token: &str) -> Result<(), ClientError> {
        let request = self.http.post(self.url("/auth/logout")).bearer_auth(access_token);
        send(request).await?;
        Ok(())
    }

    pub async fn list_pending(&self, access_token: &str) -> Result<Vec<Verification>, ClientError> {
        let request = self
            .http
            .get(self.url("/admin/verifications"))
            .bearer_auth(access_token);
        data(send(request).await?).await
    }

    pub async fn approve(&self, access_token: &str, id: DbId) -> Result<Agent, ClientError> {
        let request = self
            .http
            .post(self.url(&format!("/admin/verifications/{id}/approve")))
            .bearer_auth(access_token);
        data(send(request).await?).await
    }

    pub async fn reject(&self, access_token: &str, id: DbId) -> Result<(), ClientError> {
        let request = self
            .http
            .post(self.url(&format!("/admin/verifications/{id}/reject")))
            .bearer_auth(access_token);
        send(request).await?;
        Ok(())
    }

    pub async fn create_lead(&self, access_token: &str, form: &LeadForm) -> Result<Lead, ClientError> {
        let request = self
            .http
            .post(self.url("/leads"))
            .bearer_auth(access_token)
            .json(form);
        data(send(request).await?).await
    }

    pub async fn list_leads(&self, access_token: &str) -> Result<LeadList, ClientError> {
        let request = self.http.get(self.url("/leads")).bearer_auth(access_token);
        data(send(request).await?).await
    }

    pub async fn export_lead(&self, access_token: &str, id: DbId) -> Result<LeadCsv, ClientError> {
        let request = self
            .http
            .get(self.url(&format!("/leads/{id}/export")))
            .bearer_auth(access_token);
        let response = send(request).await?;
        let file_name = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(attachment_file_name)
            .unwrap_or_else(|| format!("lead_{id}.csv"));
        let content = response.text().await?;
        Ok(LeadCsv { file_name, content })
    }
}

/// Send a request and turn a non-success status into [`ClientError::Api`].
async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => (envelope.code, envelope.error),
        Err(_) if body.trim().is_empty() => (
            status.as_str().to_string(),
            status.canonical_reason().unwrap_or("Request failed").to_string(),
        ),
        Err(_) => (status.as_str().to_string(), body),
    };
    tracing::debug!(status = status.as_u16(), %code, "API error");
    Err(ClientError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}

async fn data<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(response.json::<DataEnvelope<T>>().await?.data)
}

/// Pull `name` out of `attachment; filename="name"`.
fn attachment_file_name(header: &str) -> Option<String> {
    let (_, rest) = header.split_once("filename=")?;
    let name = rest.trim().trim_matches('"');
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_url_switches_scheme() {
        let client = ApiClient::new("http://127.0.0.1:3000/").unwrap();
        assert_eq!(
            client.feed_url("tok"),
            "ws://127.0.0.1:3000/api/v1/admin/verifications/ws?token=tok"
        );

        let client = ApiClient::new("https://leads.example.com").unwrap();
        assert!(client.feed_url("tok").starts_with("wss://leads.example.com/"));
    }

    #[test]
    fn parses_attachment_file_name() {
        assert_eq!(
            attachment_file_name("attachment; filename=\"lead_A_B_2025-01-01_00-00-00.csv\"")
                .as_deref(),
            Some("lead_A_B_2025-01-01_00-00-00.csv")
        );
        assert_eq!(attachment_file_name("attachment"), None);
    }

    #[test]
    fn unauthorized_detection() {
        let err = ClientError::Api {
            status: 401,
            code: "UNAUTHORIZED".into(),
            message: "Session has ended".into(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Session has ended");

        let err = ClientError::Api {
            status: 403,
            code: "FORBIDDEN".into(),
            message: "Admin access required".into(),
        };
        assert!(!err.is_unauthorized());
    }
}
