//! Publishing generated videos to the linked YouTube channel.

use std::sync::Arc;

use crate::api::{Channel, HttpBackend, UploadRequest};
use crate::auth::{AuthError, CredentialStore, TokenSet};
use crate::error::Result;

/// YouTube operations authorized with the stored credentials.
///
/// Every call reads the access/refresh pair from the credential store; a
/// missing pair is [`AuthError::NotLoggedIn`].
pub struct YouTubePublisher {
    backend: Arc<HttpBackend>,
    store: Arc<dyn CredentialStore>,
    profile: String,
}

impl YouTubePublisher {
    pub fn new(backend: Arc<HttpBackend>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            backend,
            store,
            profile: crate::config::DEFAULT_PROFILE.to_string(),
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Stored credentials, if any.
    pub fn credentials(&self) -> std::result::Result<Option<TokenSet>, AuthError> {
        self.store.load(&self.profile)
    }

    fn linked_tokens(&self) -> std::result::Result<(String, String), AuthError> {
        let tokens = self.store.load(&self.profile)?.unwrap_or_default();
        let (access, refresh) = tokens.linked_pair().ok_or(AuthError::NotLoggedIn)?;
        Ok((access.to_string(), refresh.to_string()))
    }

    /// First channel of the authorized account, or `None` if it has none.
    ///
    /// The backend refreshes the access token while listing; the refreshed
    /// tokens are merged into the store.
    pub async fn linked_channel(&self) -> Result<Option<Channel>> {
        let (access, refresh) = self.linked_tokens()?;
        let listing = self.backend.list_channels(&access, &refresh).await?;
        if let Err(err) = self.store.apply_update(&self.profile, &listing.tokens) {
            tracing::warn!(error = %err, "failed to persist refreshed YouTube tokens");
        }
        Ok(listing.items.into_iter().next())
    }

    /// Start uploading every generated video of a project in the background.
    pub async fn start_video_upload(&self, request: &UploadRequest) -> Result<()> {
        let (access, refresh) = self.linked_tokens()?;
        self.backend
            .start_video_upload(&access, &refresh, request)
            .await?;
        tracing::info!(
            project = %request.project_id,
            channel = %request.channel_id,
            "video upload started"
        );
        Ok(())
    }

    /// Delete every video previously uploaded for a project from a channel.
    pub async fn remove_uploaded_videos(&self, project_id: &str, channel_id: &str) -> Result<()> {
        let (access, refresh) = self.linked_tokens()?;
        self.backend
            .remove_uploaded_videos(&access, &refresh, project_id, channel_id)
            .await?;
        tracing::info!(project = %project_id, channel = %channel_id, "uploaded video removal started");
        Ok(())
    }

    /// Forget the stored credentials.
    pub fn unlink(&self) -> std::result::Result<(), AuthError> {
        self.store.clear(&self.profile)
    }
}
