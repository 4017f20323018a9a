//! Facebox error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for facebox operations.
pub type FaceboxResult<T> = Result<T, FaceboxError>;

/// A failure reported by the facebox service itself.
///
/// The message is free text chosen by the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("facebox: {0}")]
pub struct ServerError(String);

impl ServerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServerError {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur during facebox operations.
#[derive(Debug, Error)]
pub enum FaceboxError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    UnexpectedStatus(StatusCode),

    #[error("decoding response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Reading image failed: {0}")]
    Io(#[from] std::io::Error),
}

impl FaceboxError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn server(msg: impl Into<String>) -> Self {
        Self::Server(ServerError::new(msg))
    }

    /// True if the error was detected before any network I/O.
    pub fn is_config(&self) -> bool {
        matches!(self, FaceboxError::Config(_))
    }

    /// True if the service answered but reported failure.
    pub fn is_server(&self) -> bool {
        matches!(self, FaceboxError::Server(_))
    }

    /// The server's message, for server-reported failures.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            FaceboxError::Server(e) => Some(e.message()),
            _ => None,
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            FaceboxError::UnexpectedStatus(status) => Some(status.as_u16()),
            FaceboxError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
