//! Turns a submitted form into exactly one identity-service call and resolves
//! the outcome.
//!
//! The mapping from a service result to what the user sees is pure
//! ([`resolve_login`], [`resolve_signup`]) so it can be checked against canned
//! results. [`AuthDispatcher`] wraps it with the network call and the session
//! write; the controller applies the resulting message and effect.

use super::{
    client::IdentityService,
    session::SessionStore,
    types::{LoginRequest, RegisterRequest, TokenResponse},
};
use crate::{
    config::DEFAULT_LANDING_PATH,
    error::AuthError,
    form::{FormFields, FormMode, ResultMessage},
};
use secrecy::SecretString;
use std::{fmt, sync::Arc};
use tracing::{error, info, instrument, warn};

pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const SIGNUP_SUCCEEDED: &str = "User successfully registered!";
pub const SIGNUP_REJECTED: &str = "User already registered";
pub const LOGIN_REJECTED: &str = "Invalid email or password";
pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const SIGNUP_FAILED: &str = "Signup failed. Please try again.";
pub const SESSION_NOT_SAVED: &str = "Could not save your session. Please try again.";

/// What the client should do after the form has been updated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Navigate(String),
    /// Switch to `mode` once the grace period has passed.
    SwitchMode(FormMode),
}

/// Outcome of one submission.
pub struct Resolution {
    pub message: ResultMessage,
    /// Token still to be persisted. Cleared once the dispatcher has stored it.
    pub token: Option<SecretString>,
    pub effect: Option<Effect>,
}

impl Resolution {
    fn failed(text: impl Into<String>) -> Self {
        Self {
            message: ResultMessage::error(text),
            token: None,
            effect: None,
        }
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolution")
            .field("message", &self.message)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("effect", &self.effect)
            .finish()
    }
}

/// Login success is silent: leaving the page is the confirmation.
#[must_use]
pub fn resolve_login(result: Result<TokenResponse, AuthError>, landing_path: &str) -> Resolution {
    match result {
        Ok(response) => Resolution {
            message: ResultMessage::none(),
            token: Some(response.token),
            effect: Some(Effect::Navigate(landing_path.to_string())),
        },
        Err(AuthError::Service { message, .. }) => {
            Resolution::failed(message.unwrap_or_else(|| LOGIN_REJECTED.to_string()))
        }
        Err(_) => Resolution::failed(LOGIN_FAILED),
    }
}

/// Signup success keeps the user on the form, so it is announced and followed
/// by a deferred switch to the login form.
#[must_use]
pub fn resolve_signup(result: Result<TokenResponse, AuthError>) -> Resolution {
    match result {
        Ok(response) => Resolution {
            message: ResultMessage::success(SIGNUP_SUCCEEDED),
            token: Some(response.token),
            effect: Some(Effect::SwitchMode(FormMode::Login)),
        },
        Err(AuthError::Service { message, .. }) => {
            Resolution::failed(message.unwrap_or_else(|| SIGNUP_REJECTED.to_string()))
        }
        Err(_) => Resolution::failed(SIGNUP_FAILED),
    }
}

/// Local check run before any signup request.
///
/// # Errors
/// Returns the message to show when the confirmation does not match.
pub fn validate_signup(fields: &FormFields) -> Result<(), &'static str> {
    if fields.passwords_match() {
        Ok(())
    } else {
        Err(PASSWORDS_DO_NOT_MATCH)
    }
}

pub struct AuthDispatcher<S> {
    service: S,
    sessions: Arc<dyn SessionStore>,
    landing_path: String,
}

impl<S: IdentityService> AuthDispatcher<S> {
    pub fn new(service: S, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            service,
            sessions,
            landing_path: DEFAULT_LANDING_PATH.to_string(),
        }
    }

    #[must_use]
    pub fn with_landing_path(mut self, landing_path: impl Into<String>) -> Self {
        self.landing_path = landing_path.into();
        self
    }

    /// Sends `{email, password}`; other fields are ignored.
    #[instrument(skip_all)]
    pub async fn login(&self, fields: &FormFields) -> Resolution {
        let request = LoginRequest {
            email: fields.email.clone(),
            password: fields.password.clone(),
        };

        let result = self.service.login(&request).await;
        if let Err(err) = &result {
            if err.is_transport() {
                warn!(error = %err, "login request failed");
            } else {
                info!(error = %err, "login rejected");
            }
        }

        self.persist(resolve_login(result, &self.landing_path))
    }

    /// Sends `{username, email, password}`. Callers run [`validate_signup`] first.
    #[instrument(skip_all)]
    pub async fn signup(&self, fields: &FormFields) -> Resolution {
        let request = RegisterRequest {
            username: fields.username.clone(),
            email: fields.email.clone(),
            password: fields.password.clone(),
        };

        let result = self.service.register(&request).await;
        if let Err(err) = &result {
            if err.is_transport() {
                warn!(error = %err, "signup request failed");
            } else {
                info!(error = %err, "signup rejected");
            }
        }

        self.persist(resolve_signup(result))
    }

    /// Stores the token of a successful resolution. A failed write turns the
    /// whole attempt into an error so the client never navigates without a
    /// session.
    fn persist(&self, mut resolution: Resolution) -> Resolution {
        if let Some(token) = resolution.token.take() {
            if let Err(err) = self.sessions.set(token) {
                error!(error = %err, "failed to persist session token");
                return Resolution::failed(SESSION_NOT_SAVED);
            }
        }
        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::session::MemorySessionStore,
        error::SessionError,
        form::{FieldKey, MessageKind},
    };
    use async_trait::async_trait;
    use secrecy::ExposeSecret;

    fn token(value: &str) -> TokenResponse {
        TokenResponse {
            token: SecretString::from(value.to_string()),
        }
    }

    fn service_error(status: u16, message: Option<&str>) -> AuthError {
        AuthError::Service {
            status,
            message: message.map(ToString::to_string),
        }
    }

    struct Canned(Result<String, AuthError>);

    impl Canned {
        fn reply(&self) -> Result<TokenResponse, AuthError> {
            self.0.clone().map(|value| token(&value))
        }
    }

    #[async_trait]
    impl IdentityService for Canned {
        async fn login(&self, _: &LoginRequest) -> Result<TokenResponse, AuthError> {
            self.reply()
        }

        async fn register(&self, _: &RegisterRequest) -> Result<TokenResponse, AuthError> {
            self.reply()
        }
    }

    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn set(&self, _: SecretString) -> Result<(), SessionError> {
            Err(SessionError::Poisoned)
        }

        fn get(&self) -> Result<Option<SecretString>, SessionError> {
            Ok(None)
        }
    }

    fn stored(store: &MemorySessionStore) -> Option<String> {
        store
            .get()
            .ok()
            .flatten()
            .map(|t| t.expose_secret().to_string())
    }

    #[test]
    fn login_success_navigates_without_message() {
        let resolution = resolve_login(Ok(token("T1")), "/profile");
        assert!(resolution.message.is_none());
        assert_eq!(
            resolution.token.map(|t| t.expose_secret().to_string()),
            Some("T1".to_string())
        );
        assert_eq!(
            resolution.effect,
            Some(Effect::Navigate("/profile".to_string()))
        );
    }

    #[test]
    fn login_service_error_uses_server_text_or_default() {
        let resolution = resolve_login(Err(service_error(401, Some("Wrong password"))), "/p");
        assert_eq!(resolution.message, ResultMessage::error("Wrong password"));
        assert_eq!(resolution.effect, None);

        let resolution = resolve_login(Err(service_error(401, None)), "/p");
        assert_eq!(resolution.message, ResultMessage::error(LOGIN_REJECTED));
    }

    #[test]
    fn login_transport_errors_use_generic_text() {
        for err in [
            AuthError::Network("down".to_string()),
            AuthError::Timeout("slow".to_string()),
            AuthError::Parse("garbage".to_string()),
        ] {
            let resolution = resolve_login(Err(err), "/p");
            assert_eq!(resolution.message, ResultMessage::error(LOGIN_FAILED));
            assert!(resolution.token.is_none());
            assert_eq!(resolution.effect, None);
        }
    }

    #[test]
    fn signup_success_announces_and_schedules_switch() {
        let resolution = resolve_signup(Ok(token("T2")));
        assert_eq!(resolution.message, ResultMessage::success(SIGNUP_SUCCEEDED));
        assert!(resolution.token.is_some());
        assert_eq!(resolution.effect, Some(Effect::SwitchMode(FormMode::Login)));
    }

    #[test]
    fn signup_errors() {
        let resolution = resolve_signup(Err(service_error(409, Some("Email taken"))));
        assert_eq!(resolution.message, ResultMessage::error("Email taken"));

        let resolution = resolve_signup(Err(service_error(409, None)));
        assert_eq!(resolution.message, ResultMessage::error(SIGNUP_REJECTED));

        let resolution = resolve_signup(Err(AuthError::Network("down".to_string())));
        assert_eq!(resolution.message, ResultMessage::error(SIGNUP_FAILED));
        assert_eq!(resolution.effect, None);
    }

    #[test]
    fn validate_signup_compares_passwords() {
        let mut fields = FormFields::default();
        fields.set(FieldKey::Password, "a");
        fields.set(FieldKey::ConfirmPassword, "b");
        assert_eq!(validate_signup(&fields), Err(PASSWORDS_DO_NOT_MATCH));

        fields.set(FieldKey::ConfirmPassword, "a");
        assert_eq!(validate_signup(&fields), Ok(()));
    }

    #[tokio::test]
    async fn dispatcher_persists_token_on_success() {
        let store = Arc::new(MemorySessionStore::new());
        let dispatcher = AuthDispatcher::new(Canned(Ok("T1".to_string())), store.clone())
            .with_landing_path("/dashboard");

        let resolution = dispatcher.login(&FormFields::default()).await;
        assert!(resolution.token.is_none());
        assert_eq!(
            resolution.effect,
            Some(Effect::Navigate("/dashboard".to_string()))
        );
        assert_eq!(stored(&store), Some("T1".to_string()));
    }

    #[tokio::test]
    async fn dispatcher_leaves_store_untouched_on_error() {
        let store = Arc::new(MemorySessionStore::new());
        let dispatcher = AuthDispatcher::new(
            Canned(Err(service_error(409, Some("Email taken")))),
            store.clone(),
        );

        let resolution = dispatcher.signup(&FormFields::default()).await;
        assert_eq!(resolution.message.kind, MessageKind::Error);
        assert_eq!(stored(&store), None);
    }

    #[tokio::test]
    async fn failed_session_write_becomes_error_without_effect() {
        let dispatcher = AuthDispatcher::new(Canned(Ok("T1".to_string())), Arc::new(BrokenStore));

        let resolution = dispatcher.login(&FormFields::default()).await;
        assert_eq!(resolution.message, ResultMessage::error(SESSION_NOT_SAVED));
        assert_eq!(resolution.effect, None);

        let resolution = dispatcher.signup(&FormFields::default()).await;
        assert_eq!(resolution.message, ResultMessage::error(SESSION_NOT_SAVED));
        assert_eq!(resolution.effect, None);
    }
}
