use crate::{
    cli::{
        actions::{submit::Args, Action},
        commands::{client, form},
    },
    form::FormMode,
};
use anyhow::{anyhow, Result};
use clap::ArgMatches;

/// Map parsed arguments to the action to run.
///
/// # Errors
/// Returns an error if a required value is missing or invalid.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let (name, sub_m) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("missing subcommand"))?;

    let mode = match name {
        form::CMD_LOGIN => FormMode::Login,
        form::CMD_SIGNUP => FormMode::Signup,
        form::CMD_OPEN => form::location_mode(sub_m)?,
        other => return Err(anyhow!("unknown subcommand: {other}")),
    };

    Ok(Action::Submit(Args {
        config: client::config(sub_m)?,
        mode,
        fields: form::fields(sub_m, mode)?,
    }))
}
