pub mod address;
pub mod client;
pub mod commands;
pub mod credentials;
pub mod error;
pub mod inventory;
pub mod transport;

pub use address::CameraAddress;
pub use client::{CameraClient, CommandClass, CommandParams, Endpoint, TimeoutPolicy};
pub use commands::{PresetCommand, PresetId};
pub use credentials::Credentials;
pub use error::{CameraError, Result};
pub use inventory::{PresetGroup, PresetGroups, PresetInventory, PresetListCodec, PresetMap};
pub use transport::{AuthenticatedTransport, DigestTransport, MockTransport};
