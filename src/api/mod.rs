//! Backend REST API: the seams the poller and the auth relay depend on, and
//! the reqwest implementation behind them.

pub mod http;
pub mod types;

pub use http::{status_to_error, HttpBackend};
pub use types::{
    Channel, ChannelList, ChannelSnippet, DeviceAuthorization, DeviceCode, Font, JobKind,
    JobStatus, ProjectSummary, UploadRequest,
};

use async_trait::async_trait;

use crate::auth::AuthError;
use crate::error::Result;

/// Source of job status answers for the poller.
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    async fn job_status(&self, project_id: &str, kind: JobKind) -> Result<JobStatus>;
}

/// Backend endpoints relaying the device-code authorization.
#[async_trait]
pub trait DeviceAuthApi: Send + Sync {
    async fn request_device_code(&self) -> std::result::Result<DeviceCode, AuthError>;

    async fn check_device_authorization(
        &self,
        device_code: &str,
    ) -> std::result::Result<DeviceAuthorization, AuthError>;
}
