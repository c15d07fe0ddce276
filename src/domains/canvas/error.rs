//! Canvas API error types.

use serde::Deserialize;
use thiserror::Error;

/// Maximum number of body characters kept in a remote error message.
const BODY_EXCERPT_CHARS: usize = 200;

/// Errors returned by the Canvas API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No API token was configured, so no request can be authenticated.
    #[error("CANVAS_API_TOKEN is required. Please set it in your environment or .env file.")]
    MissingToken,

    /// A URL could not be built from the base URL and request path.
    #[error("Invalid Canvas URL: {0}")]
    InvalidUrl(String),

    /// The request never produced an HTTP response (connect, TLS, timeout...).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Canvas API returned HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    /// The response body could not be decoded into the expected shape.
    #[error("Failed to decode Canvas response: {0}")]
    Decode(String),

    /// A GraphQL query came back with an `errors` array.
    #[error("GraphQL query failed: {0}")]
    Query(String),
}

/// Shapes Canvas uses for error bodies.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new invalid URL error.
    pub fn invalid_url(msg: impl Into<String>) -> Self {
        Self::InvalidUrl(msg.into())
    }

    /// Build a remote error from a status code and raw response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = extract_message(body);
        let message = match (status_hint(status), detail) {
            (Some(hint), Some(detail)) => format!("{hint} ({detail})"),
            (Some(hint), None) => hint.to_string(),
            (None, Some(detail)) => detail,
            (None, None) => "no response body".to_string(),
        };
        Self::Remote { status, message }
    }

    /// Stable error kind reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingToken | Self::InvalidUrl(_) => "ConfigurationError",
            Self::Transport(_) => "TransportError",
            Self::Remote { .. } => "RemoteError",
            Self::Decode(_) => "DecodeError",
            Self::Query(_) => "QueryError",
        }
    }

    /// HTTP status for remote errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn status_hint(status: u16) -> Option<&'static str> {
    match status {
        401 => Some("Canvas API authentication failed. Please check your CANVAS_API_TOKEN."),
        403 => Some("Canvas API access forbidden. Check your permissions for this resource."),
        404 => Some("Canvas API resource not found."),
        _ => None,
    }
}

fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(trimmed) {
        if let Some(message) = parsed.message.filter(|m| !m.is_empty()) {
            return Some(message);
        }
        if let Some(message) = parsed.errors.as_ref().and_then(first_error_message) {
            return Some(message);
        }
    }

    Some(excerpt(trimmed))
}

/// Canvas reports `errors` either as `[{"message": ..}]` or as an object keyed by field.
fn first_error_message(errors: &serde_json::Value) -> Option<String> {
    match errors {
        serde_json::Value::Array(items) => items.iter().find_map(|item| match item {
            serde_json::Value::String(s) => Some(s.clone()),
            other => other
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string),
        }),
        serde_json::Value::Object(fields) => fields.iter().find_map(|(field, value)| {
            first_error_message(value).map(|m| format!("{field}: {m}"))
        }),
        serde_json::Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn excerpt(body: &str) -> String {
    if body.chars().count() <= BODY_EXCERPT_CHARS {
        body.to_string()
    } else {
        let cut: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
        format!("{cut}...")
    }
}
