//! Response shapes specific to the HTTP layer.

use serde::Deserialize;

/// Body of `/auth/login` and `/auth/signup`.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub commit: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub uptime_seconds: Option<f64>,
}

/// Pulls the `detail` and `message` strings out of an error body. Bodies
/// that are not JSON, or whose `detail` is not a string (validation error
/// lists), yield `None`.
pub(crate) fn error_fields(body: &str) -> (Option<String>, Option<String>) {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return (None, None);
    };
    let field = |name: &str| {
        value
            .get(name)
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string)
    };
    (field("detail"), field("message"))
}
