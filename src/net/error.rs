//! Uniform error value for backend calls.
//!
//! ERROR HANDLING
//! ==============
//! Non-success responses are flattened into one readable message while the
//! HTTP status is kept, so callers can branch on authorization failures
//! without string-matching every path.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

/// Substring the backend uses when a bearer token fails validation.
const CREDENTIALS_REJECTED: &str = "could not validate credentials";

/// Errors produced by [`super::api::ChatApi`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The request never produced a response (connect, TLS, I/O).
    #[error("{0}")]
    Transport(String),

    /// A success response carried a body that did not match the expected schema.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl ApiError {
    /// Build a status error from a raw response body.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::Status { status, message: response_error_message(status, body) }
    }

    /// HTTP status, when the backend responded at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) | Self::ClientBuild(_) => None,
        }
    }

    /// True for a 401, or any error whose message reports rejected credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401) || self.to_string().to_lowercase().contains(CREDENTIALS_REJECTED)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

fn generic_failure_message(status: u16) -> String {
    format!("Request failed ({status})")
}

/// Message for a non-success response body.
pub(crate) fn response_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|data| detail_message(&data))
        .unwrap_or_else(|| generic_failure_message(status))
}

/// Extract a readable message from a FastAPI-style `detail` payload.
///
/// `{"detail": "..."}` yields the string. `{"detail": [{"loc": [...], "msg": "..."}]}`
/// yields the first entry as `"body.email: msg"`.
pub(crate) fn detail_message(data: &Value) -> Option<String> {
    match data.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => validation_entry_message(items.first()?),
        _ => None,
    }
}

fn validation_entry_message(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => {
            let msg = obj.get("msg").and_then(Value::as_str);
            match obj.get("loc").and_then(Value::as_array) {
                Some(loc) => {
                    let path = loc.iter().map(loc_segment).collect::<Vec<_>>().join(".");
                    Some(format!("{path}: {}", msg.unwrap_or("invalid value")))
                }
                None => msg.map(str::to_owned),
            }
        }
        _ => None,
    }
}

fn loc_segment(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
