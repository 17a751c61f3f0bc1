use crate::cli::{
    actions::Action,
    commands::{self, logging},
    dispatch::handler,
    telemetry,
};
use anyhow::Result;

/// Start the CLI
///
/// # Errors
/// Returns an error if logging cannot be installed or the arguments are invalid.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    let verbosity = matches
        .get_one::<u8>(logging::ARG_VERBOSITY)
        .copied()
        .unwrap_or(0);
    let json = matches.get_flag(logging::ARG_LOG_JSON);

    telemetry::init(Some(telemetry::level_from_verbosity(verbosity)), json)?;

    let action = handler(&matches)?;

    Ok(action)
}
