//! Chat view: session sidebar, thread header, messages, composer status.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::fmt::Write as _;

use crate::net::types::Message;
use crate::state::ConversationState;
use crate::state::chat::ChatState;
use crate::util::format::format_time;

/// Sidebar listing. The active session is marked with `*`.
#[must_use]
pub fn render_sidebar(chat: &ChatState) -> String {
    let mut out = String::from("Conversations\n");
    if chat.sessions.is_empty() {
        out.push_str("  No sessions yet. Start one.\n");
        return out;
    }
    for session in &chat.sessions {
        let marker = if chat.active_session_id == Some(session.id) { '*' } else { ' ' };
        let time = format_time(session.created_at.as_deref());
        let _ = writeln!(out, "{marker} [{}] {}  {time}", session.id, session.label());
    }
    out
}

fn render_message(out: &mut String, msg: &Message) {
    let time = format_time(msg.created_at.as_deref());
    if time.is_empty() {
        let _ = writeln!(out, "[{}] {}", msg.role.as_str(), msg.content);
    } else {
        let _ = writeln!(out, "[{} {time}] {}", msg.role.as_str(), msg.content);
    }
}

/// Thread view for the active session.
#[must_use]
pub fn render(state: &ConversationState) -> String {
    let mut out = String::new();
    let email = state.auth.user.as_ref().map_or("", |u| u.email.as_str());
    let _ = writeln!(out, "Logged in as {email}");
    let _ = writeln!(out, "== {} ==", state.chat.header_label());

    if state.chat.messages.is_empty() {
        out.push_str("Ask anything about Sunmarke School\n");
        out.push_str("Admissions, fees, curriculum, transport, events and more.\n");
    } else {
        for msg in &state.chat.messages {
            render_message(&mut out, msg);
        }
    }

    if state.chat.sending {
        out.push_str("Sending...\n");
    } else if state.loading {
        out.push_str("Loading...\n");
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "! {error}");
    }
    out
}
