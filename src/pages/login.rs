//! Login / registration form.
//!
//! Validation runs before any request is issued. A rejected form leaves the
//! network untouched and only sets inline feedback.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use std::fmt::Write as _;

use crate::state::ConversationState;

pub const MIN_PASSWORD_LEN: usize = 6;

pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match.";
pub const EMAIL_REQUIRED: &str = "Enter your email.";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// Values typed into the auth form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// A validated submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
}

impl AuthForm {
    #[must_use]
    pub fn login(email: &str, password: &str) -> Self {
        Self {
            mode: AuthMode::Login,
            email: email.to_owned(),
            password: password.to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn register(email: &str, password: &str, confirm_password: &str) -> Self {
        Self {
            mode: AuthMode::Register,
            email: email.to_owned(),
            password: password.to_owned(),
            confirm_password: confirm_password.to_owned(),
        }
    }

    /// Flip between login and register, dropping typed secrets.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.password.clear();
        self.confirm_password.clear();
    }

    /// Empty every field after a successful submit. Mode is kept.
    pub fn clear(&mut self) {
        self.email.clear();
        self.password.clear();
        self.confirm_password.clear();
    }

    /// Check the form and produce trimmed credentials.
    ///
    /// # Errors
    ///
    /// Returns the inline message to show when the form is not submittable.
    pub fn validate(&self) -> Result<Credentials, &'static str> {
        if self.mode == AuthMode::Register && self.password != self.confirm_password {
            return Err(PASSWORDS_DO_NOT_MATCH);
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(EMAIL_REQUIRED);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(PASSWORD_TOO_SHORT);
        }
        Ok(Credentials {
            mode: self.mode,
            email: email.to_owned(),
            password: self.password.clone(),
        })
    }

    #[must_use]
    pub fn submit_label(&self, loading: bool) -> &'static str {
        match (loading, self.mode) {
            (true, _) => "Please wait...",
            (false, AuthMode::Login) => "Login",
            (false, AuthMode::Register) => "Create account",
        }
    }

    #[must_use]
    pub fn switch_label(&self) -> &'static str {
        match self.mode {
            AuthMode::Login => "Need an account? Register",
            AuthMode::Register => "Already have an account? Login",
        }
    }
}

/// Text rendering of the unauthenticated view.
#[must_use]
pub fn render(form: &AuthForm, state: &ConversationState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Sunmark Bot");
    let _ = writeln!(out, "School Assistant");
    let _ = writeln!(out, "Sign in to manage sessions and chat with your RAG assistant.");
    let _ = writeln!(out);
    match form.mode {
        AuthMode::Login => {
            let _ = writeln!(
                out,
                "  /login <email> <password>    [{}]",
                form.submit_label(state.loading)
            );
        }
        AuthMode::Register => {
            let _ = writeln!(
                out,
                "  /register <email> <password> <confirm>    [{}]",
                form.submit_label(state.loading)
            );
        }
    }
    let _ = writeln!(out, "  /mode    ({})", form.switch_label());
    if let Some(error) = &state.error {
        let _ = writeln!(out, "! {error}");
    }
    out
}
