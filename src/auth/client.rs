//! HTTP client for the identity service. Both endpoints share one request path:
//! JSON in, `{token}` out on 2xx, `{error}` on anything else. Callers get a plain
//! `Result` and decide how failures are worded. Request bodies carry passwords
//! and must never be logged.

use super::types::{
    ErrorResponse, LoginRequest, RegisterRequest, TokenResponse, LOGIN_PATH, REGISTER_PATH,
};
use crate::{config::AppConfig, error::AuthError, APP_USER_AGENT};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info_span, Instrument};

/// The two calls the form makes against the identity service.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// # Errors
    /// Returns `AuthError::Service` for non-2xx replies and a transport variant
    /// when no usable response arrived.
    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, AuthError>;

    /// # Errors
    /// Same contract as [`IdentityService::login`].
    async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse, AuthError>;
}

#[async_trait]
impl<T: IdentityService + ?Sized> IdentityService for Arc<T> {
    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, AuthError> {
        (**self).login(request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse, AuthError> {
        (**self).register(request).await
    }
}

/// `reqwest`-backed [`IdentityService`].
#[derive(Clone, Debug)]
pub struct HttpIdentityService {
    client: Client,
    config: AppConfig,
}

impl HttpIdentityService {
    /// # Errors
    /// Returns `AuthError::Config` if the origin is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, AuthError> {
        config.validate()?;

        let mut builder = Client::builder().user_agent(APP_USER_AGENT);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| AuthError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn post_json<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<TokenResponse, AuthError> {
        let url = self.config.endpoint(path);
        let span = info_span!("identity.request", http.method = "POST", url = %url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        handle_token_response(response).await
    }
}

#[async_trait]
impl IdentityService for HttpIdentityService {
    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, AuthError> {
        self.post_json(LOGIN_PATH, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse, AuthError> {
        self.post_json(REGISTER_PATH, request).await
    }
}

fn map_request_error(err: reqwest::Error) -> AuthError {
    if err.is_timeout() {
        AuthError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        AuthError::Network(format!("Unable to reach the server: {err}"))
    }
}

async fn handle_token_response(response: Response) -> Result<TokenResponse, AuthError> {
    let status = response.status();
    debug!(status = status.as_u16(), "identity service responded");

    if status.is_success() {
        response
            .json::<TokenResponse>()
            .await
            .map_err(|err| AuthError::Parse(format!("Failed to decode response: {err}")))
    } else {
        let body = response
            .text()
            .await
            .map_err(|err| AuthError::Parse(format!("Failed to read error response: {err}")))?;
        let failure = serde_json::from_str::<ErrorResponse>(&body).map_err(|err| {
            AuthError::Parse(format!("Failed to decode error response ({status}): {err}"))
        })?;
        Err(AuthError::Service {
            status: status.as_u16(),
            message: error_text(failure),
        })
    }
}

/// Server error text, shown as sent. An empty or absent `error` yields `None`.
fn error_text(failure: ErrorResponse) -> Option<String> {
    failure.error.filter(|text| !text.is_empty())
}
