//! Error types for backend calls

use thiserror::Error;

use crate::session::SessionError;

/// Everything that can go wrong talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The request never produced a response (connection, timeout).
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response; `message` is the server's error payload if it sent one.
    #[error("{path} returned {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status {
        path: String,
        status: u16,
        message: Option<String>,
    },

    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// 2xx response whose envelope reports `success: false` or carries no data.
    #[error("{path} rejected the request: {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        path: String,
        message: Option<String>,
    },

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Message reported by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } | ApiError::Rejected { message, .. } => {
                message.as_deref().filter(|m| !m.trim().is_empty())
            }
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Collapse into the displayable failure: the server's message when it
    /// sent one, `fallback` otherwise.
    pub fn into_failure(self, fallback: &str) -> ApiFailure {
        let message = self
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string());
        tracing::warn!(error = %self, %message, "api call failed");
        ApiFailure { message }
    }
}

/// Failure shape every resource call resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiFailure {
    pub message: String,
}

impl ApiFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Pull `message` (or `error`) out of an error body.
pub(crate) fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message() {
        assert_eq!(
            extract_message(r#"{"success":false,"message":"Email already exists"}"#).as_deref(),
            Some("Email already exists")
        );
        assert_eq!(
            extract_message(r#"{"error":"Unauthorized"}"#).as_deref(),
            Some("Unauthorized")
        );
        assert_eq!(extract_message("<html>502</html>"), None);
        assert_eq!(extract_message(r#"{"message":42}"#), None);
    }

    #[test]
    fn test_failure_prefers_server_message() {
        let err = ApiError::Status {
            path: "/admins".into(),
            status: 409,
            message: Some("Email already exists".into()),
        };
        assert_eq!(err.into_failure("Failed to create admin").message, "Email already exists");
    }

    #[test]
    fn test_failure_falls_back() {
        let blank = ApiError::Status {
            path: "/admins".into(),
            status: 500,
            message: Some("  ".into()),
        };
        assert_eq!(blank.into_failure("Failed to fetch admins").message, "Failed to fetch admins");

        let session = ApiError::Session(SessionError::Corrupt("bad".into()));
        assert_eq!(session.into_failure("Failed to fetch admins").message, "Failed to fetch admins");
    }
}
