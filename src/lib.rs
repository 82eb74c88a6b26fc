//! Control client for CGI-driven PTZ cameras.
//!
//! The actual client lives in the `camera-client` crate; this package hosts the
//! end-to-end tests that run it against an in-process mock camera.

pub use camera_client::*;
