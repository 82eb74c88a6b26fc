use crate::error::{CameraError, Result};
use std::fmt;

/// User name and password presented to the camera's digest challenge.
///
/// Held for the lifetime of a client. The password never appears in `Debug`
/// output, so a client can be logged safely.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Both fields must be non-empty.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let password = password.into();

        if username.is_empty() {
            return Err(CameraError::InvalidCredentials(
                "user cannot be empty".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(CameraError::InvalidCredentials(
                "password cannot be empty".to_string(),
            ));
        }

        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_fields() {
        assert!(matches!(
            Credentials::new("", "secret"),
            Err(CameraError::InvalidCredentials(_))
        ));
        assert!(matches!(
            Credentials::new("admin", ""),
            Err(CameraError::InvalidCredentials(_))
        ));
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("admin", "hunter2").unwrap();
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }
}
