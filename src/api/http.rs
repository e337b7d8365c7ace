//! reqwest client for the Vogon backend.

use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::types::{
    AuthorizedRequest, ChannelList, CreateProjectResponse, DeviceAuthorization,
    DeviceAuthorizationResponse, DeviceCode, FeedUploadResponse, Font, GenerationStatusResponse,
    JobKind, JobStatus, ProjectSummary, UploadRequest,
};
use super::{DeviceAuthApi, JobStatusSource};
use crate::auth::AuthError;
use crate::config::VogonConfig;
use crate::error::{Result, VogonError};
use crate::project::{validate_project_id, ProjectConfig};

/// Device-authorization error codes that mean "ask again later".
const PENDING_ERRORS: &[&str] = &["authorization_pending", "slow_down"];

/// HTTP client bound to one backend base URL.
///
/// # Example
/// ```no_run
/// use vogon_client::api::HttpBackend;
///
/// # async fn example() -> vogon_client::error::Result<()> {
/// let backend = HttpBackend::new("http://localhost:8080")?;
/// for project in backend.list_projects().await? {
///     println!("{} ({})", project.name, project.size);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Build a backend from layered configuration (base URL + request timeout).
    pub fn from_config(config: &VogonConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Self::with_client(client, config.base_url())
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(|err| {
            VogonError::Configuration(format!("Invalid backend URL '{base_url}': {err}"))
        })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Rejects ids that would step outside `/api/projects/{id}/`.
    fn project_url(&self, project_id: &str, suffix: &str) -> Result<String> {
        validate_project_id(project_id)?;
        Ok(self.url(&format!("/api/projects/{project_id}/{suffix}")))
    }

    // -- projects -----------------------------------------------------------

    pub async fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        let resp = self.client.get(self.url("/api/projects/list")).send().await?;
        decode_json(resp).await
    }

    /// Create a project from the backend's base template.
    ///
    /// Returns the (sanitized) project id. A name already in use is a
    /// [`VogonError::Validation`].
    pub async fn create_project(&self, name: &str) -> Result<String> {
        crate::project::validate_project_name(name)?;
        let resp = self
            .client
            .post(self.url(&format!("/api/projects/new/name/{name}")))
            .send()
            .await?;
        let payload: CreateProjectResponse = decode_json(resp).await?;
        if !payload.success {
            return Err(VogonError::Validation(format!(
                "A project with name '{}' already exists",
                payload.project
            )));
        }
        tracing::info!(project = %payload.project, "project created");
        Ok(payload.project)
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.project_url(project_id, "delete")?)
            .send()
            .await?;
        ensure_success(resp).await.map(drop)
    }

    /// Remove every generated video; configs, assets and base videos stay.
    pub async fn clear_project(&self, project_id: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.project_url(project_id, "clear")?)
            .send()
            .await?;
        ensure_success(resp).await.map(drop)
    }

    // -- configuration ------------------------------------------------------

    pub async fn get_config(&self, project_id: &str) -> Result<ProjectConfig> {
        let resp = self
            .client
            .get(self.project_url(project_id, "config")?)
            .send()
            .await?;
        decode_json(resp).await
    }

    pub async fn save_config(&self, project_id: &str, config: &ProjectConfig) -> Result<()> {
        let resp = self
            .client
            .post(self.project_url(project_id, "config")?)
            .json(config)
            .send()
            .await?;
        ensure_success(resp).await.map(drop)
    }

    // -- video generation ---------------------------------------------------

    pub async fn generate_all_videos(&self, project_id: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.project_url(project_id, "generate_all_videos")?)
            .send()
            .await?;
        ensure_success(resp).await.map(drop)
    }

    pub async fn cancel_video_generation(&self, project_id: &str) -> Result<()> {
        let resp = self
            .client
            .get(self.project_url(project_id, "cancel_video_generation")?)
            .send()
            .await?;
        ensure_success(resp).await.map(drop)
    }

    /// Preview URL for one feed row, with a fresh cache-buster.
    pub fn preview_url(&self, project_id: &str, row: u32) -> Result<String> {
        let cache_bust = uuid::Uuid::new_v4().simple();
        Ok(format!(
            "{}?{cache_bust}",
            self.project_url(project_id, &format!("preview/row/{row}"))?
        ))
    }

    /// Render and download the preview video for one feed row.
    pub async fn fetch_preview(&self, project_id: &str, row: u32) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(self.preview_url(project_id, row)?)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    // -- assets -------------------------------------------------------------

    /// Asset paths relative to the project's asset directory, sorted.
    pub async fn list_assets(&self, project_id: &str) -> Result<Vec<String>> {
        let resp = self
            .client
            .get(self.project_url(project_id, "assets")?)
            .send()
            .await?;
        decode_json(resp).await
    }

    /// Delete an asset and return the updated asset list.
    pub async fn remove_asset(&self, project_id: &str, asset_path: &str) -> Result<Vec<String>> {
        let resp = self
            .client
            .delete(self.project_url(project_id, "assets/")?)
            .query(&[("asset_path", asset_path)])
            .send()
            .await?;
        decode_json(resp).await
    }

    pub fn asset_download_url(&self, project_id: &str, asset_path: &str) -> Result<String> {
        let raw = self.project_url(project_id, "download/assets/")?;
        let mut url = Url::parse(&raw)
            .map_err(|err| VogonError::Configuration(format!("Invalid asset URL '{raw}': {err}")))?;
        url.query_pairs_mut().append_pair("asset_path", asset_path);
        Ok(url.to_string())
    }

    pub async fn list_fonts(&self, project_id: &str) -> Result<Vec<Font>> {
        let resp = self
            .client
            .get(self.project_url(project_id, "fonts")?)
            .send()
            .await?;
        let pairs: Vec<(String, String)> = decode_json(resp).await?;
        Ok(pairs
            .into_iter()
            .map(|(display_name, path)| Font { display_name, path })
            .collect())
    }

    // -- feed + exports -----------------------------------------------------

    /// Replace the project's `feed.csv` with `rows` (header row first).
    pub async fn upload_feed(&self, project_id: &str, rows: &[Vec<String>]) -> Result<()> {
        let resp = self
            .client
            .post(self.project_url(project_id, "feed_content_upload")?)
            .json(&json!({ "feed_data": rows, "project_id": project_id }))
            .send()
            .await?;
        let payload: FeedUploadResponse = decode_json(resp).await?;
        if payload.success {
            return Ok(());
        }
        let detail = payload
            .msg
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        Err(VogonError::Validation(format!(
            "There was an error saving your feed: {detail}"
        )))
    }

    /// Download the Google Ads Editor CSV.
    ///
    /// The backend answers with `{"msg": ...}` when the CSV cannot be built
    /// (missing videos, generation errors); that message becomes a
    /// [`VogonError::Validation`].
    pub async fn google_ads_editor_csv(&self, project_id: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(self.project_url(project_id, "google_ads_editor_file")?)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        let body = resp.bytes().await?.to_vec();
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice(&body) {
            if let Some(msg) = map.get("msg").and_then(|msg| msg.as_str()) {
                return Err(VogonError::Validation(msg.to_string()));
            }
        }
        Ok(body)
    }

    // -- youtube ------------------------------------------------------------

    /// List the channels of the authorized account. The backend refreshes the
    /// access token on the way and returns it with the channels.
    pub async fn list_channels(&self, access_token: &str, refresh_token: &str) -> Result<ChannelList> {
        let resp = self
            .client
            .post(self.url("/api/youtube/list_channels"))
            .json(&json!({ "access_token": access_token, "refresh_token": refresh_token }))
            .send()
            .await?;
        decode_json(resp).await
    }

    pub async fn start_video_upload(
        &self,
        access_token: &str,
        refresh_token: &str,
        request: &UploadRequest,
    ) -> Result<()> {
        let body = AuthorizedRequest {
            access_token,
            refresh_token,
            body: json!({
                "project_id": request.project_id,
                "channel_id": request.channel_id,
                "title": request.title,
                "description": request.description,
            }),
        };
        let resp = self
            .client
            .post(self.url("/api/youtube/start_video_upload"))
            .json(&body)
            .send()
            .await?;
        ensure_success(resp).await.map(drop)
    }

    pub async fn remove_uploaded_videos(
        &self,
        access_token: &str,
        refresh_token: &str,
        project_id: &str,
        channel_id: &str,
    ) -> Result<()> {
        let body = AuthorizedRequest {
            access_token,
            refresh_token,
            body: json!({ "project_id": project_id, "channel_id": channel_id }),
        };
        let resp = self
            .client
            .post(self.url("/api/youtube/remove_uploaded_videos"))
            .json(&body)
            .send()
            .await?;
        ensure_success(resp).await.map(drop)
    }
}

#[async_trait]
impl JobStatusSource for HttpBackend {
    async fn job_status(&self, project_id: &str, kind: JobKind) -> Result<JobStatus> {
        validate_project_id(project_id)?;
        let resp = self
            .client
            .get(self.url(&kind.status_path(project_id)))
            .send()
            .await?;
        let body = ensure_success(resp).await?.text().await?;
        Ok(parse_job_status(kind, &body))
    }
}

#[async_trait]
impl DeviceAuthApi for HttpBackend {
    async fn request_device_code(&self) -> std::result::Result<DeviceCode, AuthError> {
        let resp = self
            .client
            .post(self.url("/api/youtube_auth/get_device_code"))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<DeviceAuthorizationResponse>(&body)
                .ok()
                .and_then(|payload| payload.error_description.or(payload.error))
                .unwrap_or(body);
            return Err(AuthError::InvalidResponse(format!(
                "Device code request failed with status {status}: {detail}"
            )));
        }
        Ok(resp.json().await?)
    }

    async fn check_device_authorization(
        &self,
        device_code: &str,
    ) -> std::result::Result<DeviceAuthorization, AuthError> {
        let resp = self
            .client
            .post(self.url("/api/youtube_auth/check_device_authorization"))
            .json(&json!({ "code": device_code }))
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        parse_device_authorization(status, &body)
    }
}

fn parse_device_authorization(
    status: StatusCode,
    body: &str,
) -> std::result::Result<DeviceAuthorization, AuthError> {
    let payload: DeviceAuthorizationResponse = serde_json::from_str(body).map_err(|_| {
        AuthError::InvalidResponse(format!(
            "Device authorization check failed with status {status}"
        ))
    })?;
    if let Some(code) = payload.error.as_deref() {
        if PENDING_ERRORS.contains(&code) {
            return Ok(DeviceAuthorization::Pending {
                description: payload.error_description,
            });
        }
    }
    if let Some(description) = payload.error_description.or(payload.error) {
        return Ok(DeviceAuthorization::Denied { description });
    }
    if !status.is_success() {
        return Err(AuthError::InvalidResponse(format!(
            "Device authorization check failed with status {status}"
        )));
    }
    if payload.tokens.is_empty() {
        return Ok(DeviceAuthorization::Pending { description: None });
    }
    Ok(DeviceAuthorization::Granted(payload.tokens))
}

fn parse_job_status(kind: JobKind, body: &str) -> JobStatus {
    if kind == JobKind::Generation {
        if let Ok(payload) = serde_json::from_str::<GenerationStatusResponse>(body) {
            return JobStatus {
                text: payload.current_state,
                started_at: payload.started_at.filter(|value| !value.is_empty()),
            };
        }
    }
    match serde_json::from_str::<String>(body) {
        Ok(text) => JobStatus::new(text),
        Err(_) => JobStatus::new(body),
    }
}

/// Map a non-success HTTP status and body to a client error.
pub fn status_to_error(status: u16, body: &str) -> VogonError {
    match status {
        401 | 403 => VogonError::Authentication(body.to_string()),
        _ => VogonError::api(status, body),
    }
}

async fn ensure_success(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), %body, "backend request failed");
    Err(status_to_error(status.as_u16(), &body))
}

async fn decode_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let resp = ensure_success(resp).await?;
    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}
