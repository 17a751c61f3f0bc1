use crate::config::{
    timeout_from_seconds, AppConfig, DEFAULT_API_BASE_URL, DEFAULT_LANDING_PATH,
    DEFAULT_SESSION_FILE, DEFAULT_TIMEOUT_SECONDS, ENV_API_BASE_URL, ENV_LANDING_PATH,
    ENV_SESSION_FILE, ENV_TIMEOUT,
};
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_LANDING_PATH: &str = "landing-path";
pub const ARG_SESSION_FILE: &str = "session-file";
pub const ARG_TIMEOUT: &str = "timeout";

/// Build the client configuration from global arguments.
///
/// # Errors
/// Returns an error if an argument is missing or the API URL is unusable.
pub fn config(matches: &ArgMatches) -> Result<AppConfig> {
    let read_required = |id: &str| -> Result<String> {
        matches
            .get_one::<String>(id)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
    };

    let config = AppConfig {
        api_base_url: read_required(ARG_API_URL)?,
        landing_path: read_required(ARG_LANDING_PATH)?,
        session_file: PathBuf::from(read_required(ARG_SESSION_FILE)?),
        request_timeout: timeout_from_seconds(
            matches
                .get_one::<u64>(ARG_TIMEOUT)
                .copied()
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        ),
    };
    config
        .validate()
        .with_context(|| format!("invalid --{ARG_API_URL}"))?;

    Ok(config)
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Identity service origin, example: https://api.fitai.dev")
                .env(ENV_API_BASE_URL)
                .default_value(DEFAULT_API_BASE_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_LANDING_PATH)
                .long(ARG_LANDING_PATH)
                .help("Destination after a successful login")
                .env(ENV_LANDING_PATH)
                .default_value(DEFAULT_LANDING_PATH)
                .global(true),
        )
        .arg(
            Arg::new(ARG_SESSION_FILE)
                .long(ARG_SESSION_FILE)
                .help("File holding the session token")
                .env(ENV_SESSION_FILE)
                .default_value(DEFAULT_SESSION_FILE)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("HTTP request timeout in seconds, 0 disables it")
                .env(ENV_TIMEOUT)
                .default_value("10")
                .value_parser(clap::value_parser!(u64))
                .global(true),
        )
}
