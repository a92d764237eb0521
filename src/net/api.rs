//! REST client for the chat backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`ChatApi`] is the seam the conversation controller talks through.
//! [`HttpChatApi`] is the real `reqwest` implementation; tests substitute a
//! scripted double.
//!
//! ERROR HANDLING
//! ==============
//! Every operation returns [`ApiError`]. Non-success bodies are normalized by
//! [`ApiError::from_response`] so status codes survive for 401 handling.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{
    LoginForm, Message, RegisterRequest, SendMessageRequest, SendMessageResponse, Session,
    TokenResponse, User,
};

/// Backend operations used by the client.
#[async_trait::async_trait]
pub trait ChatApi: Send + Sync {
    /// `POST /register` with a JSON `{email, password}` body.
    async fn register(&self, email: &str, password: &str) -> Result<User, ApiError>;

    /// `POST /login` with a form-encoded `username`/`password` body.
    async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError>;

    /// `GET /users/me`.
    async fn current_user(&self, token: &str) -> Result<User, ApiError>;

    /// `POST /chat/session`.
    async fn create_session(&self, token: &str) -> Result<Session, ApiError>;

    /// `GET /chat/sessions`.
    async fn list_sessions(&self, token: &str) -> Result<Vec<Session>, ApiError>;

    /// `GET /chat/{session_id}/messages`.
    async fn list_messages(&self, token: &str, session_id: i64) -> Result<Vec<Message>, ApiError>;

    /// `POST /chat/{session_id}` with a JSON `{message}` body.
    async fn send_message(&self, token: &str, session_id: i64, message: &str)
    -> Result<SendMessageResponse, ApiError>;
}

fn session_messages_path(session_id: i64) -> String {
    format!("/chat/{session_id}/messages")
}

fn session_send_path(session_id: i64) -> String {
    format!("/chat/{session_id}")
}

/// `reqwest`-backed [`ChatApi`].
#[derive(Clone, Debug)]
pub struct HttpChatApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpChatApi {
    /// Build a client for `base_url`. `timeout` of `None` keeps the transport default.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the TLS backend fails to initialize.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "backend returned error status");
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl ChatApi for HttpChatApi {
    async fn register(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let body = RegisterRequest { email, password };
        self.fetch(self.http.post(self.url("/register")).json(&body)).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let form = LoginForm { username: email, password };
        self.fetch(self.http.post(self.url("/login")).form(&form)).await
    }

    async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        self.fetch(self.http.get(self.url("/users/me")).bearer_auth(token)).await
    }

    async fn create_session(&self, token: &str) -> Result<Session, ApiError> {
        self.fetch(self.http.post(self.url("/chat/session")).bearer_auth(token)).await
    }

    async fn list_sessions(&self, token: &str) -> Result<Vec<Session>, ApiError> {
        self.fetch(self.http.get(self.url("/chat/sessions")).bearer_auth(token)).await
    }

    async fn list_messages(&self, token: &str, session_id: i64) -> Result<Vec<Message>, ApiError> {
        let url = self.url(&session_messages_path(session_id));
        self.fetch(self.http.get(url).bearer_auth(token)).await
    }

    async fn send_message(
        &self,
        token: &str,
        session_id: i64,
        message: &str,
    ) -> Result<SendMessageResponse, ApiError> {
        let url = self.url(&session_send_path(session_id));
        let body = SendMessageRequest { message };
        self.fetch(self.http.post(url).bearer_auth(token).json(&body)).await
    }
}
