//! # fitai-auth (Login & Registration Client)
//!
//! `fitai-auth` drives the credential-entry surface of the FitAI client: it owns
//! the login/registration form state, submits credentials to the remote identity
//! service, persists the returned session token, and tells the renderer where to
//! go next.
//!
//! ## Form State
//!
//! The form is an explicit [`form::FormState`] value updated by a reducer
//! ([`form::update`]). Renderers never mutate it directly; they forward intent
//! (field edits, tab selection, submit) to a [`form::FormController`] and
//! re-render from the snapshots it publishes on a `watch` channel.
//!
//! ## Submission
//!
//! - **Login** posts `{email, password}` to `/api/auth/login`. Success stores the
//!   token and navigates to the landing path without a message.
//! - **Signup** checks that both passwords match before any network call, posts
//!   `{username, email, password}` to `/api/auth/register`, stores the token,
//!   shows a success message and switches back to the login form after a grace
//!   period.
//!
//! At most one request is in flight per form. Every completion path (success,
//! service error, transport error, malformed body) returns the form to idle.
//!
//! ## Secrets
//!
//! Session tokens are held as [`secrecy::SecretString`] and are never logged.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod schedule;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
