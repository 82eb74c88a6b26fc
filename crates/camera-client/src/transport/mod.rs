//! Authenticated HTTP transport used by [`CameraClient`](crate::CameraClient).

use crate::credentials::Credentials;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub mod digest;
pub mod mock;

pub use digest::{DigestAlgorithm, DigestChallenge, DigestTransport};
pub use mock::{MockTransport, RecordedRequest};

/// One outbound GET, described independently of the HTTP library.
#[derive(Debug, Clone, Copy)]
pub struct TransportRequest<'a> {
    /// Scheme, host and port, e.g. `http://192.0.2.10:80`.
    pub base_url: &'a str,
    /// Absolute CGI path.
    pub path: &'a str,
    /// Query parameters in send order.
    pub params: &'a [(String, String)],
    /// Upper bound for the whole exchange, digest retry included.
    pub timeout: Duration,
}

/// Status and body of the final response of an exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Trait for performing a single authenticated GET against the camera
///
/// Implementations handle the digest challenge internally and only return the
/// response to the authenticated request. They fail with
/// `AuthenticationFailure` when the camera rejects the credentials and with
/// `NetworkTimeout` when nothing arrives within `request.timeout`.
#[async_trait]
pub trait AuthenticatedTransport: Send + Sync {
    async fn get(
        &self,
        request: &TransportRequest<'_>,
        credentials: &Credentials,
    ) -> Result<TransportResponse>;
}
