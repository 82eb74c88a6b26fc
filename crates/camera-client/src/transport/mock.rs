use super::{AuthenticatedTransport, TransportRequest, TransportResponse};
use crate::credentials::Credentials;
use crate::error::{CameraError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

/// A request captured by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub base_url: String,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub timeout: Duration,
    pub username: String,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
enum MockReply {
    Response(TransportResponse),
    Timeout,
    Rejected,
}

/// Mock transport for testing
///
/// Replies are consumed in the order they were queued. Once the queue is empty
/// every request gets `200` with an empty body.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, status: u16, body: impl Into<String>) -> &Self {
        lock(&self.replies).push_back(MockReply::Response(TransportResponse::new(status, body)));
        self
    }

    pub fn push_timeout(&self) -> &Self {
        lock(&self.replies).push_back(MockReply::Timeout);
        self
    }

    pub fn push_auth_failure(&self) -> &Self {
        lock(&self.replies).push_back(MockReply::Rejected);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl AuthenticatedTransport for MockTransport {
    async fn get(
        &self,
        request: &TransportRequest<'_>,
        credentials: &Credentials,
    ) -> Result<TransportResponse> {
        debug!(path = request.path, "mock: camera request");

        lock(&self.requests).push(RecordedRequest {
            base_url: request.base_url.to_string(),
            path: request.path.to_string(),
            params: request.params.to_vec(),
            timeout: request.timeout,
            username: credentials.username().to_string(),
        });

        let reply = lock(&self.replies).pop_front();
        match reply {
            None => Ok(TransportResponse::new(200, "")),
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Timeout) => Err(CameraError::NetworkTimeout {
                timeout: request.timeout,
            }),
            Some(MockReply::Rejected) => Err(CameraError::auth("mock: credentials rejected")),
        }
    }
}
