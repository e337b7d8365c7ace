//! YouTube device-code authorization and credential storage.

pub mod device_code;
pub mod error;
pub mod store;
pub mod token;

pub use device_code::{
    CheckOutcome, DeviceAuthRelay, DeviceAuthSession, DeviceAuthStatus, RelayState,
};
pub use error::AuthError;
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use token::TokenSet;
