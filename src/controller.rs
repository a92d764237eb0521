//! Conversation controller: owns client state and reconciles it with the backend.
//!
//! ARCHITECTURE
//! ============
//! [`ChatController`] is a cheap `Clone` handle. State lives behind one
//! `std::sync::Mutex` that is only held between awaits, never across them,
//! so any number of operations may be in flight at once.
//!
//! ORDERING
//! ========
//! Message-list fetches are tagged with `ChatState::messages_seq` at issue
//! time and applied only if the tag is still the latest when they resolve.
//! Bootstrap and session-creation results are applied only if the token they
//! were issued with is still current. Requests are never cancelled; superseded
//! results are dropped on arrival.
//!
//! ERROR HANDLING
//! ==============
//! No operation returns an error to the caller for backend failures. Every
//! failure lands in `ConversationState::error` with state left consistent.
//! Unauthorized responses tear the whole session down.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::net::api::ChatApi;
use crate::net::error::ApiError;
use crate::net::types::{Message, Role};
use crate::pages::login::{AuthForm, AuthMode};
use crate::state::{ConversationState, SESSION_EXPIRED_MESSAGE};
use crate::util::format::{now_millis, now_rfc3339};
use crate::util::storage::TokenStore;

/// Error shown when a send succeeds but the generator produced nothing.
pub const NO_RESPONSE_MESSAGE: &str = "No response from chat service.";

/// Why a send was refused before touching the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendRejection {
    EmptyDraft,
    NotAuthenticated,
    AlreadySending,
}

/// Result of [`ChatController::send`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    Rejected(SendRejection),
    /// The message was stored and the backend returned a reply.
    Delivered,
    /// The message was stored but the backend returned no reply.
    NoReply,
    /// The message was stored but re-fetching the thread failed.
    RefreshFailed(ApiError),
    /// Auth changed while the first-message session was being created.
    SessionEnded,
    Failed(ApiError),
}

#[derive(Clone)]
pub struct ChatController {
    api: Arc<dyn ChatApi>,
    store: Arc<dyn TokenStore>,
    state: Arc<Mutex<ConversationState>>,
}

impl ChatController {
    /// Build a controller, picking up any token persisted by a previous run.
    ///
    /// The token is not validated here; call [`Self::restore`] to bootstrap it.
    pub fn new(api: Arc<dyn ChatApi>, store: Arc<dyn TokenStore>) -> Self {
        let token = store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read persisted token");
            None
        });
        let mut state = ConversationState::default();
        state.auth.token = token;
        Self { api, store, state: Arc::new(Mutex::new(state)) }
    }

    fn lock(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> ConversationState {
        self.lock().clone()
    }

    pub fn set_draft(&self, text: &str) {
        text.clone_into(&mut self.lock().chat.draft);
    }

    pub fn clear_error(&self) {
        self.lock().error = None;
    }

    // =========================================================================
    // AUTH
    // =========================================================================

    /// Bootstrap a token persisted by a previous run, if there is one.
    pub async fn restore(&self) {
        let token = self.lock().auth.token.clone();
        if let Some(token) = token {
            tracing::debug!("restoring persisted session");
            self.bootstrap(token).await;
        }
    }

    /// Submit the login or register form.
    ///
    /// Register mode registers and then logs in with the same credentials.
    /// On success the form is cleared and the new token is bootstrapped.
    /// Returns whether a token was acquired.
    pub async fn submit_auth(&self, form: &mut AuthForm) -> bool {
        let creds = match form.validate() {
            Ok(creds) => creds,
            Err(message) => {
                self.lock().set_error(message);
                return false;
            }
        };
        {
            let mut s = self.lock();
            if s.loading {
                return false;
            }
            s.loading = true;
            s.error = None;
        }

        let result = async {
            if creds.mode == AuthMode::Register {
                self.api.register(&creds.email, &creds.password).await?;
                tracing::info!("account registered");
            }
            self.api.login(&creds.email, &creds.password).await
        }
        .await;

        match result {
            Ok(token) => {
                form.clear();
                self.acquire_token(token.access_token).await;
                true
            }
            Err(e) => {
                tracing::info!(error = %e, "auth submit failed");
                let mut s = self.lock();
                s.loading = false;
                s.set_error(e.to_string());
                false
            }
        }
    }

    async fn acquire_token(&self, token: String) {
        if let Err(e) = self.store.save(&token) {
            tracing::warn!(error = %e, "could not persist token");
        }
        {
            let mut s = self.lock();
            s.auth.token = Some(token.clone());
            s.auth.user = None;
        }
        self.bootstrap(token).await;
    }

    /// Fetch the user and the session list in parallel. Any failure clears
    /// all state; a partial authenticated state is never kept.
    async fn bootstrap(&self, token: String) {
        {
            let mut s = self.lock();
            s.loading = true;
            s.error = None;
        }

        let result = tokio::try_join!(
            self.api.current_user(&token),
            self.api.list_sessions(&token)
        );

        let loaded = {
            let mut s = self.lock();
            if !s.auth.holds(&token) {
                tracing::debug!("discarding bootstrap for superseded token");
                return;
            }
            match result {
                Ok((user, sessions)) => {
                    tracing::info!(sessions = sessions.len(), "bootstrap complete");
                    let first = sessions.first().map(|x| x.id);
                    let active = s.chat.active_session_id.or(first);
                    s.auth.user = Some(user);
                    s.chat.sessions = sessions;
                    s.chat.active_session_id = active;
                    s.loading = false;
                    Ok(())
                }
                Err(e) => Err(e),
            }
        };

        match loaded {
            Ok(()) => self.load_messages().await,
            Err(e) => {
                tracing::warn!(error = %e, "bootstrap failed; clearing auth");
                let message = if e.is_unauthorized() {
                    SESSION_EXPIRED_MESSAGE.to_owned()
                } else {
                    e.to_string()
                };
                self.reset_auth(Some(message));
            }
        }
    }

    /// Drop the session and the persisted token unconditionally.
    pub fn logout(&self) {
        tracing::info!("logout");
        self.reset_auth(None);
    }

    fn expire_session(&self) {
        tracing::info!("backend rejected credentials; session expired");
        self.reset_auth(Some(SESSION_EXPIRED_MESSAGE.to_owned()));
    }

    fn reset_auth(&self, error: Option<String>) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "could not clear persisted token");
        }
        self.lock().reset_auth(error);
    }

    // =========================================================================
    // SESSIONS
    // =========================================================================

    /// Make `session_id` active and fetch its thread. Re-selecting the active
    /// session re-fetches it.
    pub async fn select_session(&self, session_id: i64) {
        {
            let mut s = self.lock();
            if !s.auth.is_authenticated() {
                return;
            }
            s.chat.active_session_id = Some(session_id);
        }
        self.load_messages().await;
    }

    /// Fetch the active session's thread, applying the result only if no newer
    /// fetch has been issued in the meantime.
    pub async fn load_messages(&self) {
        let (token, session_id, seq) = {
            let mut s = self.lock();
            let seq = s.chat.next_messages_seq();
            let (Some(token), Some(session_id)) = (s.auth.token.clone(), s.chat.active_session_id)
            else {
                s.chat.messages.clear();
                s.loading = false;
                return;
            };
            s.loading = true;
            s.error = None;
            (token, session_id, seq)
        };

        let result = self.api.list_messages(&token, session_id).await;

        let mut s = self.lock();
        if !s.chat.is_latest_fetch(seq) {
            tracing::debug!(seq, session_id, "discarding stale message list");
            return;
        }
        s.loading = false;
        match result {
            Ok(messages) => s.chat.messages = messages,
            Err(e) if e.is_unauthorized() => {
                drop(s);
                self.expire_session();
            }
            Err(e) => {
                tracing::warn!(session_id, error = %e, "message fetch failed");
                s.set_error(e.to_string());
            }
        }
    }

    /// Create a session, re-fetch the full list, and switch to the new one.
    pub async fn new_session(&self) {
        let token = {
            let mut s = self.lock();
            let Some(token) = s.auth.token.clone() else {
                return;
            };
            if s.loading {
                return;
            }
            s.loading = true;
            s.error = None;
            token
        };

        let result = async {
            let created = self.api.create_session(&token).await?;
            let sessions = self.api.list_sessions(&token).await?;
            Ok::<_, ApiError>((created, sessions))
        }
        .await;

        {
            let mut s = self.lock();
            if !s.auth.holds(&token) {
                return;
            }
            s.loading = false;
            match result {
                Ok((created, sessions)) => {
                    tracing::info!(session_id = created.id, "session created");
                    s.chat.sessions = sessions;
                    s.chat.active_session_id = Some(created.id);
                    s.chat.messages.clear();
                }
                Err(e) if e.is_unauthorized() => {
                    drop(s);
                    self.expire_session();
                    return;
                }
                Err(e) => {
                    s.set_error(e.to_string());
                    return;
                }
            }
        }
        self.load_messages().await;
    }

    // =========================================================================
    // SEND
    // =========================================================================

    /// Send the current draft.
    ///
    /// Sends are serialized: while one is outstanding further calls are
    /// rejected. A user message is appended optimistically and either
    /// replaced by the server's thread or removed again if the backend never
    /// stored it. The draft comes back only in that last case.
    pub async fn send(&self) -> SendOutcome {
        let (token, text, session_id) = {
            let mut s = self.lock();
            let text = s.chat.draft.trim().to_owned();
            if text.is_empty() {
                return SendOutcome::Rejected(SendRejection::EmptyDraft);
            }
            let Some(token) = s.auth.token.clone() else {
                return SendOutcome::Rejected(SendRejection::NotAuthenticated);
            };
            if s.chat.sending {
                return SendOutcome::Rejected(SendRejection::AlreadySending);
            }
            s.chat.sending = true;
            s.error = None;
            s.chat.draft.clear();
            (token, text, s.chat.active_session_id)
        };

        let outcome = self.deliver(&token, &text, session_id).await;

        let mut s = self.lock();
        s.chat.sending = false;
        // Only a message the backend never stored goes back into the draft.
        let unsent = matches!(outcome, SendOutcome::Failed(_));
        if unsent && s.auth.holds(&token) && s.chat.draft.is_empty() {
            s.chat.draft = text;
        }
        outcome
    }

    async fn deliver(&self, token: &str, text: &str, session_id: Option<i64>) -> SendOutcome {
        let session_id = match session_id {
            Some(id) => id,
            None => match self.api.create_session(token).await {
                Ok(created) => {
                    let mut s = self.lock();
                    if !s.auth.holds(token) {
                        tracing::debug!("auth changed while creating a session; dropping send");
                        return SendOutcome::SessionEnded;
                    }
                    tracing::info!(session_id = created.id, "session created for first message");
                    let id = created.id;
                    s.chat.active_session_id = Some(id);
                    s.chat.next_messages_seq();
                    s.loading = false;
                    s.chat.messages.clear();
                    s.chat.sessions.insert(0, created);
                    id
                }
                Err(e) => return self.fail_send(token, e, None),
            },
        };

        let temp_id = now_millis();
        {
            let mut s = self.lock();
            if s.chat.active_session_id == Some(session_id) {
                s.chat.messages.push(Message {
                    id: temp_id,
                    role: Role::User,
                    content: text.to_owned(),
                    created_at: Some(now_rfc3339()),
                });
            }
        }

        let reply = match self.api.send_message(token, session_id, text).await {
            Ok(reply) => reply,
            Err(e) => return self.fail_send(token, e, Some(temp_id)),
        };

        // Only refresh the thread if it is still the one on screen.
        let seq = {
            let mut s = self.lock();
            (s.chat.active_session_id == Some(session_id)).then(|| {
                s.loading = false;
                s.chat.next_messages_seq()
            })
        };
        if let Some(seq) = seq {
            let result = self.api.list_messages(token, session_id).await;
            if let Err(e) = self.apply_refresh(seq, session_id, result) {
                return SendOutcome::RefreshFailed(e);
            }
        }

        if reply.has_reply() {
            return SendOutcome::Delivered;
        }
        tracing::warn!(session_id, "send stored but no reply was generated");
        let mut s = self.lock();
        if s.auth.holds(token) {
            s.set_error(NO_RESPONSE_MESSAGE);
        }
        SendOutcome::NoReply
    }

    /// Apply the post-send thread refresh under the same sequence rule as
    /// [`Self::load_messages`]. A stale result, success or failure, is dropped.
    /// On failure the optimistic message stays; the backend already stored it.
    fn apply_refresh(
        &self,
        seq: u64,
        session_id: i64,
        result: Result<Vec<Message>, ApiError>,
    ) -> Result<(), ApiError> {
        let mut s = self.lock();
        if !s.chat.is_latest_fetch(seq) {
            tracing::debug!(seq, session_id, "discarding stale post-send refresh");
            return Ok(());
        }
        match result {
            Ok(messages) => {
                s.chat.messages = messages;
                Ok(())
            }
            Err(e) if e.is_unauthorized() => {
                drop(s);
                self.expire_session();
                Err(e)
            }
            Err(e) => {
                tracing::warn!(session_id, error = %e, "post-send refresh failed");
                s.set_error(e.to_string());
                Err(e)
            }
        }
    }

    fn fail_send(&self, token: &str, err: ApiError, temp_id: Option<i64>) -> SendOutcome {
        let mut s = self.lock();
        if !s.auth.holds(token) {
            return SendOutcome::Failed(err);
        }
        if let Some(id) = temp_id {
            s.chat.remove_message(id);
        }
        if err.is_unauthorized() {
            drop(s);
            self.expire_session();
        } else {
            tracing::warn!(error = %err, "send failed");
            s.set_error(err.to_string());
        }
        SendOutcome::Failed(err)
    }
}
