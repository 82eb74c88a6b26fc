use crate::address::CameraAddress;
use crate::credentials::Credentials;
use crate::error::{CameraError, Result};
use crate::transport::{AuthenticatedTransport, DigestTransport, TransportRequest};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default HTTP port of the CGI interface.
pub const DEFAULT_PORT: u16 = 80;

/// Timeout for inventory and other query commands.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for interactive action commands (preset call, white balance).
pub const ACTION_TIMEOUT: Duration = Duration::from_secs(2);

/// The fixed CGI endpoints of the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Inquiry,
    PresetPosition,
    Imaging,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Inquiry => "/command/inquiry.cgi",
            Self::PresetPosition => "/command/presetposition.cgi",
            Self::Imaging => "/command/imaging.cgi",
        }
    }
}

/// Which timeout a command runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandClass {
    Query,
    Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    pub query: Duration,
    pub action: Duration,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            query: QUERY_TIMEOUT,
            action: ACTION_TIMEOUT,
        }
    }
}

impl TimeoutPolicy {
    pub fn for_class(&self, class: CommandClass) -> Duration {
        match class {
            CommandClass::Query => self.query,
            CommandClass::Action => self.action,
        }
    }
}

/// Ordered command arguments, sent as URL query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandParams(Vec<(String, String)>);

impl CommandParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CommandParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Client for the camera's CGI command interface.
///
/// Holds only the validated address, the credentials and the transport, none of
/// which change after construction, so one instance can be shared between tasks.
#[derive(Clone)]
pub struct CameraClient {
    address: CameraAddress,
    port: u16,
    credentials: Credentials,
    timeouts: TimeoutPolicy,
    transport: Arc<dyn AuthenticatedTransport>,
}

impl CameraClient {
    /// Client using the digest-authenticating HTTP transport.
    pub fn new(address: CameraAddress, credentials: Credentials) -> Result<Self> {
        let transport = DigestTransport::new()?;
        Ok(Self::with_transport(address, credentials, Arc::new(transport)))
    }

    /// Validate textual connection settings and build a client.
    ///
    /// The address is checked before anything touches the network.
    pub fn connect(address: &str, username: &str, password: &str) -> Result<Self> {
        let address = CameraAddress::validate(address)?;
        let credentials = Credentials::new(username, password)?;
        Self::new(address, credentials)
    }

    pub fn with_transport(
        address: CameraAddress,
        credentials: Credentials,
        transport: Arc<dyn AuthenticatedTransport>,
    ) -> Self {
        Self {
            address,
            port: DEFAULT_PORT,
            credentials,
            timeouts: TimeoutPolicy::default(),
            transport,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutPolicy) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn address(&self) -> CameraAddress {
        self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeouts(&self) -> TimeoutPolicy {
        self.timeouts
    }

    pub fn base_url(&self) -> String {
        if self.port == DEFAULT_PORT {
            format!("http://{}", self.address)
        } else {
            format!("http://{}:{}", self.address, self.port)
        }
    }

    /// Issue one command and return the raw response body.
    ///
    /// Any status outside `200..=299` becomes `CommandFailed`.
    pub async fn send(
        &self,
        endpoint: Endpoint,
        params: &CommandParams,
        class: CommandClass,
    ) -> Result<String> {
        let base_url = self.base_url();
        let timeout = self.timeouts.for_class(class);

        debug!(
            camera = %self.address,
            path = endpoint.path(),
            params = %params,
            timeout_ms = timeout.as_millis() as u64,
            "sending camera command"
        );

        let request = TransportRequest {
            base_url: &base_url,
            path: endpoint.path(),
            params: params.as_slice(),
            timeout,
        };
        let response = self.transport.get(&request, &self.credentials).await?;

        if !(200..300).contains(&response.status) {
            warn!(
                camera = %self.address,
                path = endpoint.path(),
                status = response.status,
                "camera command failed"
            );
            return Err(CameraError::CommandFailed {
                status: response.status,
            });
        }

        Ok(response.body)
    }
}

impl fmt::Debug for CameraClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraClient")
            .field("address", &self.address)
            .field("port", &self.port)
            .field("credentials", &self.credentials)
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}
