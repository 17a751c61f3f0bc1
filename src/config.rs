//! Client configuration for the identity service origin, the post-login landing
//! path, the session file and the HTTP timeout. The binary fills this from clap
//! arguments (which fall back to env); embedders call [`AppConfig::load`], which
//! reads the same environment variables directly. Configuration values are
//! public; do not store secrets here.

use crate::error::AuthError;
use std::{env, path::PathBuf, time::Duration};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_LANDING_PATH: &str = "/profile";
pub const DEFAULT_SESSION_FILE: &str = ".fitai/session";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

pub const ENV_API_BASE_URL: &str = "FITAI_API_URL";
pub const ENV_LANDING_PATH: &str = "FITAI_LANDING_PATH";
pub const ENV_SESSION_FILE: &str = "FITAI_SESSION_FILE";
pub const ENV_TIMEOUT: &str = "FITAI_TIMEOUT";

/// Resolved client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub landing_path: String,
    pub session_file: PathBuf,
    pub request_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            landing_path: DEFAULT_LANDING_PATH.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            request_timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)),
        }
    }
}

impl AppConfig {
    /// Loads config from the environment, keeping defaults for unset or blank values.
    ///
    /// # Errors
    /// Returns `AuthError::Config` if the API origin is not an http(s) URL or the
    /// timeout is not a whole number of seconds.
    pub fn load() -> Result<Self, AuthError> {
        let mut config = Self::default();

        if let Some(value) = read_env(ENV_API_BASE_URL) {
            config.api_base_url = value;
        }
        if let Some(value) = read_env(ENV_LANDING_PATH) {
            config.landing_path = value;
        }
        if let Some(value) = read_env(ENV_SESSION_FILE) {
            config.session_file = PathBuf::from(value);
        }
        if let Some(value) = read_env(ENV_TIMEOUT) {
            let seconds = value.parse::<u64>().map_err(|_| {
                AuthError::Config(format!("{ENV_TIMEOUT} must be a number of seconds"))
            })?;
            config.request_timeout = timeout_from_seconds(seconds);
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks that the API origin is usable.
    ///
    /// # Errors
    /// Returns `AuthError::Config` if the origin does not parse or is not http(s).
    pub fn validate(&self) -> Result<(), AuthError> {
        let url = Url::parse(self.api_base_url.trim())
            .map_err(|err| AuthError::Config(format!("Invalid API URL: {err}")))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AuthError::Config(format!(
                "Unsupported API URL scheme: {scheme}"
            ))),
        }
    }

    /// Builds an endpoint URL from the configured origin and a path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        build_url_with_base(&self.api_base_url, path)
    }
}

/// `0` disables the client-side timeout.
#[must_use]
pub fn timeout_from_seconds(seconds: u64) -> Option<Duration> {
    (seconds > 0).then(|| Duration::from_secs(seconds))
}

/// Joins a base URL and a path with exactly one slash between them.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| normalize_value(&value))
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
