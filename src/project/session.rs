use std::sync::Arc;

use tokio::sync::watch;

use super::assets::AssetCatalog;
use super::config::{ConfigState, ProjectConfig};
use super::feed::FEED_FILE;
use crate::api::{Font, HttpBackend, JobKind, UploadRequest};
use crate::config::VogonConfig;
use crate::error::Result;
use crate::poller::JobStatusPoller;
use crate::youtube::YouTubePublisher;

/// An open project: its configuration plus the status pollers for its jobs.
///
/// Dropping the session stops every poll chain it started.
pub struct ProjectSession {
    backend: Arc<HttpBackend>,
    project_id: String,
    config: ConfigState,
    poller: JobStatusPoller,
}

impl ProjectSession {
    /// Session with default poll timing. No polling starts until asked.
    pub fn new(
        backend: Arc<HttpBackend>,
        project_id: impl Into<String>,
        config: ProjectConfig,
    ) -> Self {
        let project_id = project_id.into();
        let poller = JobStatusPoller::new(backend.clone(), project_id.clone());
        Self::with_poller(backend, poller, config)
    }

    pub fn with_poller(
        backend: Arc<HttpBackend>,
        poller: JobStatusPoller,
        config: ProjectConfig,
    ) -> Self {
        Self {
            backend,
            project_id: poller.project_id().to_string(),
            config: ConfigState::new(config),
            poller,
        }
    }

    /// Load a project's configuration and start watching both of its jobs.
    pub async fn open(
        backend: Arc<HttpBackend>,
        settings: &VogonConfig,
        project_id: impl Into<String>,
    ) -> Result<Self> {
        let project_id = project_id.into();
        let config = backend.get_config(&project_id).await?;
        let poller = JobStatusPoller::with_settings(
            backend.clone(),
            project_id.clone(),
            settings.poll_settings(JobKind::Generation),
            settings.poll_settings(JobKind::Upload),
        );
        let session = Self::with_poller(backend, poller, config);
        for kind in JobKind::ALL {
            session.poller.start(kind);
        }
        tracing::info!(project = %session.project_id, "project opened");
        Ok(session)
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn backend(&self) -> &Arc<HttpBackend> {
        &self.backend
    }

    pub fn poller(&self) -> &JobStatusPoller {
        &self.poller
    }

    // -- configuration ------------------------------------------------------

    pub fn config(&self) -> Arc<ProjectConfig> {
        self.config.current()
    }

    pub fn subscribe_config(&self) -> watch::Receiver<Arc<ProjectConfig>> {
        self.config.subscribe()
    }

    /// Change the local configuration. Nothing is sent until [`save_config`].
    ///
    /// [`save_config`]: ProjectSession::save_config
    pub fn update_config(
        &self,
        f: impl FnOnce(&ProjectConfig) -> ProjectConfig,
    ) -> Arc<ProjectConfig> {
        self.config.update(f)
    }

    pub async fn save_config(&self) -> Result<()> {
        let config = self.config.current();
        self.backend.save_config(&self.project_id, &config).await
    }

    /// Replace the local configuration with the backend's copy.
    pub async fn reload_config(&self) -> Result<Arc<ProjectConfig>> {
        let config = self.backend.get_config(&self.project_id).await?;
        Ok(self.config.replace(config))
    }

    // -- video generation ---------------------------------------------------

    /// Start generating every video, then watch the generation job.
    pub async fn generate_all_videos(&self) -> Result<()> {
        self.backend.generate_all_videos(&self.project_id).await?;
        self.poller.start(JobKind::Generation);
        Ok(())
    }

    pub async fn cancel_video_generation(&self) -> Result<()> {
        self.backend.cancel_video_generation(&self.project_id).await
    }

    pub fn preview_url(&self, row: u32) -> Result<String> {
        self.backend.preview_url(&self.project_id, row)
    }

    pub async fn fetch_preview(&self, row: u32) -> Result<Vec<u8>> {
        self.backend.fetch_preview(&self.project_id, row).await
    }

    // -- youtube ------------------------------------------------------------

    /// Upload every generated video to `channel_id`, titled and described
    /// from the project configuration.
    ///
    /// Upload polling starts before the request is sent.
    pub async fn start_video_upload(
        &self,
        publisher: &YouTubePublisher,
        channel_id: &str,
    ) -> Result<()> {
        self.poller.start(JobKind::Upload);
        let config = self.config.current();
        let request = UploadRequest {
            project_id: self.project_id.clone(),
            channel_id: channel_id.to_string(),
            title: config.video_title().to_string(),
            description: config.video_description().to_string(),
        };
        publisher.start_video_upload(&request).await
    }

    /// Upload polling starts before the request is sent.
    pub async fn remove_uploaded_videos(
        &self,
        publisher: &YouTubePublisher,
        channel_id: &str,
    ) -> Result<()> {
        self.poller.start(JobKind::Upload);
        publisher
            .remove_uploaded_videos(&self.project_id, channel_id)
            .await
    }

    // -- feed + assets ------------------------------------------------------

    /// Store rows read from a spreadsheet as the project feed and point the
    /// configuration at it. The configuration is saved afterwards.
    pub async fn import_feed(&self, sheet_url: &str, rows: &[Vec<String>]) -> Result<()> {
        self.backend.upload_feed(&self.project_id, rows).await?;
        self.config.update(|config| {
            config
                .with_field("trix_url", sheet_url)
                .with_field("data_file", FEED_FILE)
        });
        self.save_config().await?;
        tracing::info!(project = %self.project_id, rows = rows.len(), "feed imported");
        Ok(())
    }

    pub async fn assets(&self) -> Result<AssetCatalog> {
        let paths = self.backend.list_assets(&self.project_id).await?;
        Ok(AssetCatalog::from_paths(paths))
    }

    pub async fn remove_asset(&self, asset_path: &str) -> Result<AssetCatalog> {
        let paths = self
            .backend
            .remove_asset(&self.project_id, asset_path)
            .await?;
        Ok(AssetCatalog::from_paths(paths))
    }

    pub fn asset_download_url(&self, asset_path: &str) -> Result<String> {
        self.backend
            .asset_download_url(&self.project_id, asset_path)
    }

    pub async fn fonts(&self) -> Result<Vec<Font>> {
        self.backend.list_fonts(&self.project_id).await
    }

    pub async fn google_ads_editor_csv(&self) -> Result<Vec<u8>> {
        self.backend.google_ads_editor_csv(&self.project_id).await
    }

    /// Stop watching both jobs. Also happens on drop.
    pub fn close(&self) {
        self.poller.stop_all();
    }
}
