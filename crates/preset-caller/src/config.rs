use anyhow::{anyhow, Context, Result};
use camera_client::{CameraAddress, CameraClient, Credentials, TimeoutPolicy};
use std::env;
use std::time::Duration;

/// Address pre-filled when `CAMERA_ADDR` is unset (TEST-NET-1).
pub const DEFAULT_CAMERA_ADDR: &str = "192.0.2.0";

#[derive(Clone)]
pub struct CallerConfig {
    pub camera_addr: String,
    pub username: String,
    pub password: String,
    pub port: u16,
    pub query_timeout: Duration,
    pub action_timeout: Duration,
}

impl CallerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any variable source; `from_env` passes the process environment.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let camera_addr = var("CAMERA_ADDR").unwrap_or_else(|| DEFAULT_CAMERA_ADDR.to_string());
        let username = var("CAMERA_USER").unwrap_or_default();
        let password = var("CAMERA_PASS").unwrap_or_default();

        let port = match var("CAMERA_PORT") {
            Some(value) => value.parse::<u16>().context("invalid CAMERA_PORT")?,
            None => camera_client::client::DEFAULT_PORT,
        };

        let defaults = TimeoutPolicy::default();
        let query_timeout = duration_ms(&var, "QUERY_TIMEOUT_MS")?.unwrap_or(defaults.query);
        let action_timeout = duration_ms(&var, "ACTION_TIMEOUT_MS")?.unwrap_or(defaults.action);

        Ok(Self {
            camera_addr,
            username,
            password,
            port,
            query_timeout,
            action_timeout,
        })
    }

    /// Check every field before a client is built and return the parsed
    /// address. Nothing here touches the network.
    pub fn validate(&self) -> Result<CameraAddress> {
        validate_non_empty(&self.camera_addr, "camera address")?;
        validate_non_empty(&self.username, "user")?;
        validate_non_empty(&self.password, "pass")?;
        Ok(CameraAddress::validate(&self.camera_addr)?)
    }

    pub fn build_client(&self) -> Result<CameraClient> {
        let address = self.validate()?;
        let credentials = Credentials::new(&self.username, &self.password)?;
        let client = CameraClient::new(address, credentials)
            .context("failed to create camera client")?
            .with_port(self.port)
            .with_timeouts(TimeoutPolicy {
                query: self.query_timeout,
                action: self.action_timeout,
            });

        Ok(client)
    }
}

fn duration_ms(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<Duration>> {
    var(key)
        .map(|value| {
            value
                .parse::<u64>()
                .map(Duration::from_millis)
                .with_context(|| format!("invalid {key}"))
        })
        .transpose()
}

fn validate_non_empty(value: &str, field_name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("input {}", field_name));
    }
    Ok(())
}
