use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the evaluation backend client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the bearer credential. The session has already
    /// been invalidated when this is returned.
    #[error("not authorized: {}", or_placeholder(.detail.as_deref(), None, "credential rejected"))]
    Unauthorized { detail: Option<String> },

    /// Any other non-2xx response.
    #[error(
        "backend returned {status}: {}",
        or_placeholder(.detail.as_deref(), .message.as_deref(), "no detail")
    )]
    Status {
        status: StatusCode,
        detail: Option<String>,
        message: Option<String>,
    },

    /// A protected endpoint was called without a credential in the session.
    #[error("not logged in")]
    NotAuthenticated,

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

fn or_placeholder<'a>(
    detail: Option<&'a str>,
    message: Option<&'a str>,
    placeholder: &'a str,
) -> &'a str {
    detail.or(message).unwrap_or(placeholder)
}

impl ApiError {
    /// The response body's `detail` string, when the backend sent one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { detail } | ApiError::Status { detail, .. } => {
                detail.as_deref()
            }
            _ => None,
        }
    }

    /// Readable text for an inline error: `detail`, then `message`, then the
    /// given fallback.
    #[must_use]
    pub fn user_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            ApiError::Status {
                detail, message, ..
            } => detail.as_deref().or(message.as_deref()).unwrap_or(fallback),
            ApiError::Unauthorized { detail } => detail.as_deref().unwrap_or(fallback),
            _ => fallback,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. } | ApiError::NotAuthenticated)
    }
}
