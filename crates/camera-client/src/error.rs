use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by camera operations.
///
/// Nothing is retried automatically; every variant propagates to the caller of
/// the operation that produced it.
#[derive(Debug, Error)]
pub enum CameraError {
    /// Address text was not a dotted-quad IPv4 address. Never reaches the network.
    #[error("invalid camera address: {input:?}")]
    InvalidAddress { input: String },

    /// User name or password was empty at construction.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The camera rejected the credentials after the digest exchange.
    #[error("authentication failed: {0}")]
    AuthenticationFailure(String),

    /// No response within the per-call timeout.
    #[error("no response from camera within {timeout:?}")]
    NetworkTimeout { timeout: Duration },

    /// The camera answered a well-formed request with a non-2xx status.
    #[error("camera command failed with HTTP status {status}")]
    CommandFailed { status: u16 },

    /// The inventory body does not match the `key=value&...` format.
    #[error("malformed camera response: {0}")]
    MalformedResponse(String),

    /// Connection-level failure that is neither a timeout nor an auth rejection.
    #[error("transport error: {0}")]
    Transport(String),
}

impl CameraError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::AuthenticationFailure(msg.into())
    }

    /// HTTP status carried by a `CommandFailed`, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::CommandFailed { status } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CameraError>;
