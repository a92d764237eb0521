//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The token decides which view renders: no token means the auth form,
//! a token means the chat view (even while the user is still loading).

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::User;

/// Bearer token plus the account it was issued for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl AuthState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// True when `token` is still the one in effect.
    #[must_use]
    pub fn holds(&self, token: &str) -> bool {
        self.token.as_deref() == Some(token)
    }
}
