//! HTTP client for the authentication endpoints.
//!
//! [`ApiClient::authorize`] is the outgoing-request interceptor: it attaches
//! the current session token as a bearer credential. Any protected call
//! should be built with it (or with [`ApiClient::get`]).

use evendiona_core::identity::{Envelope, ErrorEnvelope, Identity, MePayload, TokenPayload};
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::{SessionRecord, SessionStore};

/// Thin wrapper over `reqwest::Client` bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /api/auth/admin/login -- exchange admin credentials for a token.
    pub async fn admin_login(&self, username: &str, password: &str) -> Result<String, ClientError> {
        let body = serde_json::json!({ "username": username, "password": password });
        let response = self
            .http
            .post(self.url("/api/auth/admin/login"))
            .json(&body)
            .send()
            .await?;
        let payload: TokenPayload = read_envelope(response).await?;
        Ok(payload.token)
    }

    /// Log in and store the resulting session, replacing any previous one.
    pub async fn admin_sign_in(
        &self,
        session: &SessionStore,
        username: &str,
        password: &str,
    ) -> Result<SessionRecord, ClientError> {
        let token = self.admin_login(username, password).await?;
        let record = SessionRecord::admin(username, token);
        session.login(record.clone())?;
        tracing::info!(username, "Admin signed in");
        Ok(record)
    }

    /// GET /api/auth/me -- ask the server who `token` belongs to.
    pub async fn me(&self, token: &str) -> Result<Identity, ClientError> {
        let response = self
            .http
            .get(self.url("/api/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;
        let payload: MePayload = read_envelope(response).await?;
        Ok(payload.user)
    }

    /// Attach the stored session token, if any, as a bearer credential.
    pub fn authorize(&self, request: RequestBuilder, session: &SessionStore) -> RequestBuilder {
        match session.token() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    /// Start an authorized GET against `path`.
    pub fn get(&self, path: &str, session: &SessionStore) -> RequestBuilder {
        self.authorize(self.http.get(self.url(path)), session)
    }
}

/// Decode a `{ success, data }` envelope, mapping error statuses to
/// [`ClientError`] variants.
async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        let envelope: Envelope<T> = response.json().await?;
        return Ok(envelope.data);
    }

    let body = response.text().await.unwrap_or_default();
    Err(error_from_status(status, &body))
}

fn error_from_status(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());

    match status {
        StatusCode::BAD_REQUEST => ClientError::Validation(message),
        StatusCode::UNAUTHORIZED => ClientError::Unauthenticated(message),
        StatusCode::FORBIDDEN => ClientError::Forbidden(message),
        other => ClientError::Status {
            status: other.as_u16(),
            message,
        },
    }
}
