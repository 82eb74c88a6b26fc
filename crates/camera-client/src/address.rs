//! Camera address validation.

use crate::error::{CameraError, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// A validated IPv4 camera address.
///
/// Only dotted-quad text is accepted: four decimal octets in `0..=255`, no
/// surrounding whitespace, no port, no host names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraAddress(Ipv4Addr);

impl CameraAddress {
    /// Validate address text. Performs no network access.
    pub fn validate(text: &str) -> Result<Self> {
        text.parse::<Ipv4Addr>()
            .map(Self)
            .map_err(|_| CameraError::InvalidAddress {
                input: text.to_string(),
            })
    }

    pub fn ip(&self) -> Ipv4Addr {
        self.0
    }
}

impl FromStr for CameraAddress {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self> {
        Self::validate(s)
    }
}

impl From<Ipv4Addr> for CameraAddress {
    fn from(ip: Ipv4Addr) -> Self {
        Self(ip)
    }
}

impl fmt::Display for CameraAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for CameraAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_dotted_quad() {
        let addr = CameraAddress::validate("192.0.2.0").unwrap();
        assert_eq!(addr.ip(), Ipv4Addr::new(192, 0, 2, 0));
        assert_eq!(addr.to_string(), "192.0.2.0");

        assert!(CameraAddress::validate("0.0.0.0").is_ok());
        assert!(CameraAddress::validate("255.255.255.255").is_ok());
    }

    #[test]
    fn test_rejects_malformed_input() {
        for input in [
            "999.1.1.1",
            "1.2.3",
            "abc.def.gha.b",
            "1.2.3.4.5",
            "256.0.0.1",
            "-1.0.0.1",
            " 10.0.0.1",
            "10.0.0.1 ",
            "10.0.0.1:80",
            "10.0.0.1/24",
            "",
            "camera.local",
        ] {
            match CameraAddress::validate(input) {
                Err(CameraError::InvalidAddress { input: rejected }) => {
                    assert_eq!(rejected, input)
                }
                other => panic!("expected InvalidAddress for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_from_str_matches_validate() {
        let parsed: CameraAddress = "10.1.2.3".parse().unwrap();
        assert_eq!(parsed, CameraAddress::from(Ipv4Addr::new(10, 1, 2, 3)));
        assert!("10.1.2".parse::<CameraAddress>().is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let addr = CameraAddress::validate("192.168.0.10").unwrap();
        assert_eq!(serde_json::to_string(&addr).unwrap(), "\"192.168.0.10\"");
    }
}
