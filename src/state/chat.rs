//! Session sidebar and message-thread state.
//!
//! DESIGN
//! ======
//! `messages_seq` is the stale-response guard: each message-list fetch takes
//! the next value when issued and is applied only if it still equals the
//! latest one when it resolves.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use crate::net::types::{Message, Session};

/// Header label when no session is active yet.
pub const NO_SESSION_LABEL: &str = "New Chat";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatState {
    /// Sessions in server order.
    pub sessions: Vec<Session>,
    pub active_session_id: Option<i64>,
    /// Thread for the active session, possibly with one optimistic entry.
    pub messages: Vec<Message>,
    pub draft: String,
    /// True while a send is outstanding. Sends are serialized on this flag.
    pub sending: bool,
    /// Latest issued message-list fetch.
    pub messages_seq: u64,
}

impl ChatState {
    #[must_use]
    pub fn active_session(&self) -> Option<&Session> {
        let id = self.active_session_id?;
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Label for the thread header.
    #[must_use]
    pub fn header_label(&self) -> String {
        self.active_session().map_or_else(|| NO_SESSION_LABEL.to_owned(), Session::label)
    }

    /// Issue a new fetch sequence number, superseding every earlier one.
    pub fn next_messages_seq(&mut self) -> u64 {
        self.messages_seq += 1;
        self.messages_seq
    }

    #[must_use]
    pub fn is_latest_fetch(&self, seq: u64) -> bool {
        self.messages_seq == seq
    }

    /// Drop the message with `id`. Returns whether anything was removed.
    pub fn remove_message(&mut self, id: i64) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        self.messages.len() != before
    }
}
