//! Client configuration resolved from flags and environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
const TOKEN_DIR_NAME: &str = ".sunmark";
const TOKEN_FILE_NAME: &str = "auth.json";
const FALLBACK_TOKEN_PATH: &str = ".sunmark-auth.json";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token_path: PathBuf,
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Build config from raw optional values. Blank values count as unset.
    ///
    /// The binary feeds this from clap, which reads `SUNMARK_API_BASE_URL`,
    /// `SUNMARK_TOKEN_PATH` and `SUNMARK_REQUEST_TIMEOUT_SECS` when the
    /// matching flag is absent. `home` picks the default token path.
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout_secs` is present but not a positive integer.
    pub fn from_parts(
        base_url: Option<&str>,
        token_path: Option<&str>,
        timeout_secs: Option<&str>,
        home: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let base_url = non_blank(base_url)
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_owned();
        let token_path =
            non_blank(token_path).map_or_else(|| default_token_path(home), PathBuf::from);
        let request_timeout = non_blank(timeout_secs).map(parse_timeout).transpose()?;
        Ok(Self { base_url, token_path, request_timeout })
    }
}

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidValue {
            var: "SUNMARK_REQUEST_TIMEOUT_SECS",
            value: raw.to_owned(),
        }),
    }
}

fn default_token_path(home: Option<&str>) -> PathBuf {
    match non_blank(home) {
        Some(home) => PathBuf::from(home).join(TOKEN_DIR_NAME).join(TOKEN_FILE_NAME),
        None => PathBuf::from(FALLBACK_TOKEN_PATH),
    }
}
