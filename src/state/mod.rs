//! Client-side state shared between the controller and the views.
//!
//! DESIGN
//! ======
//! `auth` and `chat` are kept separate so an auth reset can be expressed as
//! "replace both with defaults" while the fetch sequence keeps counting.

pub mod auth;
pub mod chat;


use auth::AuthState;
use chat::ChatState;

/// Error shown after an unauthorized response tears the session down.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// Everything the views render from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversationState {
    pub auth: AuthState,
    pub chat: ChatState,
    /// True while a bootstrap, auth submit, session create, or message fetch runs.
    pub loading: bool,
    pub error: Option<String>,
}

impl ConversationState {
    /// Clear token, user, sessions, active session, messages and draft.
    ///
    /// The fetch sequence is advanced rather than reset so that any fetch still
    /// in flight resolves as stale.
    pub fn reset_auth(&mut self, error: Option<String>) {
        let seq = self.chat.messages_seq + 1;
        let sending = self.chat.sending;
        self.auth = AuthState::default();
        self.chat = ChatState { messages_seq: seq, sending, ..ChatState::default() };
        self.loading = false;
        self.error = error.filter(|e| !e.is_empty());
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}
