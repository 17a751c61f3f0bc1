use crate::form::{FieldKey, FormFields, FormMode};
use anyhow::{anyhow, Context, Result};
use clap::{parser::MatchesError, Arg, ArgMatches, Command};
use url::Url;

pub const CMD_LOGIN: &str = "login";
pub const CMD_SIGNUP: &str = "signup";
pub const CMD_OPEN: &str = "open";

pub const ARG_USERNAME: &str = "username";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CONFIRM_PASSWORD: &str = "confirm-password";
pub const ARG_LOCATION: &str = "location";

const fn arg_id(key: FieldKey) -> &'static str {
    match key {
        FieldKey::Username => ARG_USERNAME,
        FieldKey::Email => ARG_EMAIL,
        FieldKey::Password => ARG_PASSWORD,
        FieldKey::ConfirmPassword => ARG_CONFIRM_PASSWORD,
    }
}

fn field_arg(key: FieldKey) -> Arg {
    let id = arg_id(key);
    let (help, env) = match key {
        FieldKey::Username => ("Full name", "FITAI_USERNAME"),
        FieldKey::Email => ("Account email", "FITAI_EMAIL"),
        FieldKey::Password => ("Account password", "FITAI_PASSWORD"),
        FieldKey::ConfirmPassword => ("Password confirmation", "FITAI_CONFIRM_PASSWORD"),
    };

    Arg::new(id)
        .long(id)
        .help(help)
        .env(env)
        .hide_env_values(key.is_secret())
}

fn required_fields(mode: FormMode) -> &'static [FieldKey] {
    crate::form::view::visible_fields(mode)
}

#[must_use]
pub fn login_command() -> Command {
    required_fields(FormMode::Login).iter().fold(
        Command::new(CMD_LOGIN).about("Log in with email and password"),
        |command, key| command.arg(field_arg(*key).required(true)),
    )
}

#[must_use]
pub fn signup_command() -> Command {
    required_fields(FormMode::Signup).iter().fold(
        Command::new(CMD_SIGNUP).about("Create an account"),
        |command, key| command.arg(field_arg(*key).required(true)),
    )
}

#[must_use]
pub fn open_command() -> Command {
    FieldKey::ALL.iter().fold(
        Command::new(CMD_OPEN)
            .about("Open the form at a location; ?signup=true selects the signup form")
            .arg(
                Arg::new(ARG_LOCATION)
                    .help("Page location, example: http://localhost:3000/login?signup=true")
                    .required(true),
            ),
        |command, key| command.arg(field_arg(*key)),
    )
}

/// Reads the initial form mode from the `open` location.
///
/// # Errors
/// Returns an error if the location is missing or is not a URL.
pub fn location_mode(matches: &ArgMatches) -> Result<FormMode> {
    let location = matches
        .get_one::<String>(ARG_LOCATION)
        .ok_or_else(|| anyhow!("missing required argument: <{ARG_LOCATION}>"))?;
    let url = Url::parse(location).with_context(|| format!("invalid location: {location}"))?;
    Ok(FormMode::from_location(&url))
}

/// Collects field values, requiring the ones the given form shows.
///
/// # Errors
/// Returns an error naming the first missing field.
pub fn fields(matches: &ArgMatches, mode: FormMode) -> Result<FormFields> {
    let mut fields = FormFields::default();
    for key in FieldKey::ALL {
        // `login` does not define the signup-only fields
        let value = match matches.try_get_one::<String>(arg_id(key)) {
            Ok(value) => value,
            Err(MatchesError::UnknownArgument { .. }) => None,
            Err(err) => return Err(err.into()),
        };
        if let Some(value) = value {
            fields.set(key, value.clone());
        }
    }

    for key in required_fields(mode) {
        if fields.get(*key).is_empty() {
            return Err(anyhow!("missing required argument: --{}", arg_id(*key)));
        }
    }

    Ok(fields)
}
