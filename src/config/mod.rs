//! Configuration system (layered: code > env > config file > defaults).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::api::JobKind;
use crate::auth::FileCredentialStore;
use crate::error::{Result, VogonError};
use crate::poller::PollSettings;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_PROFILE: &str = "default";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const CONFIG_FILE_NAME: &str = "config.toml";

/// Client configuration.
///
/// Resolution order, later layers winning:
/// 1. built-in defaults
/// 2. `~/.vogon/config.toml` (or an explicit file via [`VogonConfig::with_file`])
/// 3. `VOGON_*` environment variables (a `.env` file is honored)
/// 4. `with_*` setters in code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VogonConfig {
    base_url: String,
    generation_poll: PollSettings,
    upload_poll: PollSettings,
    request_timeout: Duration,
    credentials_dir: PathBuf,
    profile: String,
}

impl Default for VogonConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// On-disk form of the configuration. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    generation_poll_ms: Option<u64>,
    upload_poll_ms: Option<u64>,
    upload_initial_delay_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
    credentials_dir: Option<PathBuf>,
    profile: Option<String>,
}

impl VogonConfig {
    /// Built-in defaults only.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            generation_poll: PollSettings::default_for(JobKind::Generation),
            upload_poll: PollSettings::default_for(JobKind::Upload),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            credentials_dir: default_vogon_dir(),
            profile: DEFAULT_PROFILE.to_string(),
        }
    }

    /// Defaults, then the default config file (if present), then the environment.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let path = default_vogon_dir().join(CONFIG_FILE_NAME);
        let config = if path.exists() {
            Self::new().with_file(&path)?
        } else {
            Self::new()
        };
        config.with_env()
    }

    /// Overlay the values set in a TOML config file.
    pub fn with_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&raw).map_err(|err| {
            VogonError::Configuration(format!("Invalid config file {}: {err}", path.display()))
        })?;
        Ok(self.apply_file(file))
    }

    /// Overlay `VOGON_*` environment variables.
    pub fn with_env(self) -> Result<Self> {
        self.with_vars(|key| std::env::var(key).ok())
    }

    /// Overlay variables from an arbitrary lookup (the environment, a map in tests).
    pub fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup("VOGON_BASE_URL") {
            self.base_url = url;
        }
        if let Some(ms) = parse_var(&lookup, "VOGON_GENERATION_POLL_MS")? {
            self.generation_poll.interval = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var(&lookup, "VOGON_UPLOAD_POLL_MS")? {
            self.upload_poll.interval = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_var(&lookup, "VOGON_REQUEST_TIMEOUT_SECS")? {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = lookup("VOGON_CREDENTIALS_DIR") {
            self.credentials_dir = PathBuf::from(dir);
        }
        if let Some(profile) = lookup("VOGON_PROFILE") {
            self.profile = profile;
        }
        Ok(self)
    }

    fn apply_file(mut self, file: ConfigFile) -> Self {
        if let Some(url) = file.base_url {
            self.base_url = url;
        }
        if let Some(ms) = file.generation_poll_ms {
            self.generation_poll.interval = Duration::from_millis(ms);
        }
        if let Some(ms) = file.upload_poll_ms {
            self.upload_poll.interval = Duration::from_millis(ms);
        }
        if let Some(ms) = file.upload_initial_delay_ms {
            self.upload_poll.initial_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = file.credentials_dir {
            self.credentials_dir = dir;
        }
        if let Some(profile) = file.profile {
            self.profile = profile;
        }
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_poll_settings(mut self, kind: JobKind, settings: PollSettings) -> Self {
        match kind {
            JobKind::Generation => self.generation_poll = settings,
            JobKind::Upload => self.upload_poll = settings,
        }
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_credentials_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.credentials_dir = dir.into();
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn poll_settings(&self, kind: JobKind) -> PollSettings {
        match kind {
            JobKind::Generation => self.generation_poll,
            JobKind::Upload => self.upload_poll,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn credentials_dir(&self) -> &Path {
        &self.credentials_dir
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// File-backed credential store rooted at the configured directory.
    pub fn credential_store(&self) -> FileCredentialStore {
        FileCredentialStore::new(self.credentials_dir.clone())
    }
}

fn parse_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            VogonError::Configuration(format!("{key} must be a whole number, got '{raw}'"))
        }),
    }
}

/// `~/.vogon`, or `.vogon` in the working directory when no home is known.
pub fn default_vogon_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".vogon"))
        .unwrap_or_else(|| PathBuf::from(".vogon"))
}
