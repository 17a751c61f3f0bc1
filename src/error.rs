use thiserror::Error;

/// Failures produced while talking to the identity service.
///
/// `Service` carries the server's own error text when it sent one; the
/// dispatcher decides what the user sees when it did not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {}", .message.as_deref().unwrap_or("no error text"))]
    Service {
        status: u16,
        message: Option<String>,
    },
    #[error("Response error: {0}")]
    Parse(String),
}

impl AuthError {
    /// Whether the request never produced a usable response.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Service { .. })
    }
}

/// Failures from a [`crate::auth::SessionStore`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session store lock poisoned")]
    Poisoned,
}
