//! Convenience re-exports for common use.

pub use crate::api::{HttpBackend, JobKind, JobStatus, JobStatusSource};
pub use crate::auth::{
    CheckOutcome, CredentialStore, DeviceAuthRelay, FileCredentialStore, TokenSet,
};
pub use crate::config::VogonConfig;
pub use crate::error::{Result, VogonError};
pub use crate::poller::{JobStatusPoller, PollState, Visibility};
pub use crate::project::{ProjectConfig, ProjectSession};
pub use crate::youtube::YouTubePublisher;
