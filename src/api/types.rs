//! Wire types exchanged with the Vogon backend.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::auth::TokenSet;

/// Long-running backend job tracked by the status poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobKind {
    /// Bulk generation of every video variation in a project.
    Generation,
    /// Upload of generated videos to YouTube.
    Upload,
}

impl JobKind {
    pub const ALL: [JobKind; 2] = [JobKind::Generation, JobKind::Upload];

    /// Backend path reporting the status of this job for a project.
    pub fn status_path(&self, project_id: &str) -> String {
        match self {
            Self::Generation => format!("/api/projects/{project_id}/update_on_video_generation"),
            Self::Upload => format!("/api/youtube/read_log/{project_id}"),
        }
    }
}

/// Latest status reported for a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    /// Human-readable progress, e.g. `"50% done"` or the tail of the upload log.
    pub text: String,
    /// When the job started, if the backend reports it.
    pub started_at: Option<String>,
}

impl JobStatus {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            started_at: None,
        }
    }
}

/// Device/user code pair returned when a device-code authorization starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCode {
    pub device_code: String,
    pub user_code: String,
    /// Google answers with `verification_url`; RFC 8628 servers use `verification_uri`.
    #[serde(alias = "verification_uri")]
    pub verification_url: String,
}

/// Answer to a single device-authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceAuthorization {
    /// The user approved; the backend relayed (some of) the tokens.
    Granted(TokenSet),
    /// The user has not acted yet. `description` is the backend's
    /// explanation, when it sent one.
    Pending { description: Option<String> },
    /// The backend reported an error; `description` is shown verbatim.
    Denied { description: String },
}

/// A YouTube channel owned by the authorized account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<ChannelSnippet>,
}

impl Channel {
    /// Channel title, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.snippet
            .as_ref()
            .map(|snippet| snippet.title.as_str())
            .unwrap_or(self.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSnippet {
    pub title: String,
}

/// `list_channels` response: the channels plus refreshed tokens.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelList {
    #[serde(default)]
    pub items: Vec<Channel>,
    #[serde(flatten)]
    pub tokens: TokenSet,
}

/// Parameters for a bulk YouTube upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub project_id: String,
    pub channel_id: String,
    /// Title template; the backend substitutes feed columns per video.
    pub title: String,
    pub description: String,
}

/// A project known to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub name: String,
    /// Disk usage in human-readable form, e.g. `"2.1G"`.
    #[serde(default)]
    pub size: String,
}

/// A font available to text overlays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub display_name: String,
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateProjectResponse {
    pub success: bool,
    pub project: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeedUploadResponse {
    pub success: bool,
    #[serde(default)]
    pub msg: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerationStatusResponse {
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub current_state: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DeviceAuthorizationResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(flatten)]
    pub tokens: TokenSet,
}

#[derive(Debug, Serialize)]
pub(crate) struct AuthorizedRequest<'a, T: Serialize> {
    pub access_token: &'a str,
    pub refresh_token: &'a str,
    #[serde(flatten)]
    pub body: T,
}
