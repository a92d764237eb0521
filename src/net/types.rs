//! Wire DTOs for the chat backend's REST API.
//!
//! DESIGN
//! ======
//! These mirror the backend's JSON payloads. Unknown fields are ignored so the
//! client keeps working when the server adds columns to its rows.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Placeholder title the backend leaves on freshly created sessions.
pub const PLACEHOLDER_SESSION_TITLE: &str = "new chat";

/// The authenticated account, as returned by `GET /users/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A chat session row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Session {
    /// Sidebar/header label.
    ///
    /// Untitled sessions and sessions still carrying the backend's
    /// `"New Chat"` placeholder fall back to `"Chat {id}"`.
    #[must_use]
    pub fn label(&self) -> String {
        let title = self.title.as_deref().unwrap_or_default().trim();
        if title.is_empty() || title.eq_ignore_ascii_case(PLACEHOLDER_SESSION_TITLE) {
            return format!("Chat {}", self.id);
        }
        title.to_owned()
    }
}

/// Author of a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message in a session thread.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Server id, or a millisecond timestamp for optimistic local messages.
    pub id: i64,
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `POST /register` body.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /login` form body. The backend uses OAuth2 password-form naming.
#[derive(Debug, Serialize)]
pub struct LoginForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// `POST /login` response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// `POST /chat/{id}` body.
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub message: &'a str,
}

/// `POST /chat/{id}` response. `response` is the assistant's generated reply.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SendMessageResponse {
    #[serde(default)]
    pub response: Option<String>,
}

impl SendMessageResponse {
    /// True when the backend produced a non-empty reply.
    #[must_use]
    pub fn has_reply(&self) -> bool {
        self.response.as_deref().is_some_and(|r| !r.is_empty())
    }
}
