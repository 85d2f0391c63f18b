//! HTTP client for the influencer evaluation backend.
//!
//! Wraps `reqwest` with bearer-credential handling, typed error bodies, and
//! JSON deserialization. Every protected call reads the credential from the
//! shared [`Session`]; a `401` anywhere invalidates that session.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use infleval_core::{AppConfig, BriefId, ScoredInfluencer};

use crate::error::ApiError;
use crate::session::Session;
use crate::types::{error_fields, HealthStatus};

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_USER_AGENT: &str = "infleval/0.1 (report-client)";

/// Client for the evaluation backend's REST API.
///
/// Use [`ApiClient::new`] for the default local backend,
/// [`ApiClient::from_config`] in the binary, or [`ApiClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: Arc<Session>,
}

impl ApiClient {
    /// Creates a client pointed at the default local backend.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(session: Arc<Session>, timeout_secs: u64) -> Result<Self, ApiError> {
        Self::with_base_url(session, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::with_base_url`].
    pub fn from_config(session: Arc<Session>, config: &AppConfig) -> Result<Self, ApiError> {
        Self::build(
            session,
            config.request_timeout_secs,
            &config.api_base_url,
            &config.user_agent,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        session: Arc<Session>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ApiError> {
        Self::build(session, timeout_secs, base_url, DEFAULT_USER_AGENT)
    }

    fn build(
        session: Arc<Session>,
        timeout_secs: u64,
        base_url: &str,
        user_agent: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so relative joins append to the `/api`
        // prefix instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Fetches the scored influencers for one brief.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotAuthenticated`] if the session holds no credential.
    /// - [`ApiError::Unauthorized`] on `401`; the session is invalidated.
    /// - [`ApiError::Status`] on any other non-2xx status.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the body is neither a list of records
    ///   nor `null`.
    pub async fn fetch_report(
        &self,
        brief_id: BriefId,
    ) -> Result<Vec<ScoredInfluencer>, ApiError> {
        let url = self.endpoint(&format!("reports/{brief_id}"))?;
        tracing::debug!(brief_id = %brief_id, "fetching report");
        let request = self.authorized(self.client.get(url))?;
        // A `null` body is an empty report.
        let rows: Option<Vec<ScoredInfluencer>> = self
            .send_json(request, &format!("GET /reports/{brief_id}"))
            .await?;
        Ok(rows.unwrap_or_default())
    }

    /// Reads the backend's `/health` document, served at the host root
    /// outside the API prefix.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] on a non-2xx status.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the body does not match.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint("/health")?;
        self.send_json(self.client.get(url), "GET /health").await
    }

    /// Resolves `path` against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    /// Attaches the session's bearer credential.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotAuthenticated`] without touching the network
    /// when the session is empty.
    pub(crate) fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let credential = self
            .session
            .credential()
            .ok_or(ApiError::NotAuthenticated)?;
        Ok(request.bearer_auth(credential.expose()))
    }

    /// Sends the request, maps non-2xx statuses to typed errors, and parses
    /// the body as JSON.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, ApiError> {
        let response = request.header("Accept", "application/json").send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            let (detail, _) = error_fields(&body);
            tracing::warn!(%status, context, "backend rejected credential");
            self.session.invalidate();
            return Err(ApiError::Unauthorized { detail });
        }
        if !status.is_success() {
            let (detail, message) = error_fields(&body);
            tracing::warn!(%status, context, detail = detail.as_deref(), "request failed");
            return Err(ApiError::Status {
                status,
                detail,
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}
