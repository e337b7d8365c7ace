//! CLI entry point for Vogon.

pub mod auth;
pub mod jobs;
pub mod projects;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::api::{HttpBackend, JobKind};
use crate::config::VogonConfig;
use crate::youtube::YouTubePublisher;

/// Error type returned by every command handler.
pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Vogon video-ad generator CLI
#[derive(Parser, Debug)]
#[command(name = "vogon", version, about = "Vogon video-ad generator CLI")]
pub struct Cli {
    /// Backend base URL (overrides VOGON_BASE_URL and the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Credential profile
    #[arg(long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// YouTube account linking
    Auth(AuthArgs),
    /// Project management
    Projects(ProjectsArgs),
    /// Generate every video of a project
    Generate(GenerateArgs),
    /// Cancel a running video generation
    Cancel(ProjectArg),
    /// Follow the status of a project job
    Watch(WatchArgs),
    /// Publish generated videos on YouTube
    Youtube(YoutubeArgs),
    /// List the assets of a project
    Assets(ProjectArg),
    /// Download the Google Ads Editor CSV of a project
    AdsCsv(AdsCsvArgs),
}

/// Arguments for the `auth` subcommand group.
#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

/// Auth subcommands for login, status, and logout.
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Link a YouTube account with a device code
    Login,
    /// Show whether an account is linked
    Status,
    /// Forget the stored YouTube credentials
    Logout,
}

#[derive(Parser, Debug)]
pub struct ProjectsArgs {
    #[command(subcommand)]
    pub command: ProjectCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List projects with their size on disk
    List,
    /// Create a project from the base template
    Create(ProjectArg),
    /// Delete a project
    Delete(ProjectArg),
    /// Remove a project's generated videos
    Clear(ProjectArg),
}

#[derive(Parser, Debug)]
pub struct ProjectArg {
    /// Project name
    pub project: String,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Project name
    pub project: String,

    /// Keep printing generation status until interrupted
    #[arg(long)]
    pub watch: bool,
}

#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Project name
    pub project: String,

    /// Job to follow (generation, upload)
    #[arg(long, default_value = "generation", value_parser = parse_job_kind)]
    pub kind: JobKind,
}

#[derive(Parser, Debug)]
pub struct YoutubeArgs {
    #[command(subcommand)]
    pub command: YoutubeCommands,
}

#[derive(Subcommand, Debug)]
pub enum YoutubeCommands {
    /// Show the linked channel
    Channel,
    /// Upload every generated video of a project
    Upload(UploadArgs),
    /// Remove a project's uploaded videos from the channel
    Remove(ProjectArg),
}

#[derive(Parser, Debug)]
pub struct UploadArgs {
    /// Project name
    pub project: String,

    /// Video title (defaults to the project's video_title)
    #[arg(long)]
    pub title: Option<String>,

    /// Video description (defaults to the project's video_description)
    #[arg(long)]
    pub description: Option<String>,

    /// Keep printing upload status until interrupted
    #[arg(long)]
    pub watch: bool,
}

#[derive(Parser, Debug)]
pub struct AdsCsvArgs {
    /// Project name
    pub project: String,

    /// Output file
    #[arg(long, short)]
    pub out: PathBuf,
}

fn parse_job_kind(raw: &str) -> Result<JobKind, String> {
    raw.parse()
        .map_err(|_| format!("unknown job '{raw}' (expected generation or upload)"))
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Layered configuration with the global flags applied on top.
    pub fn config(&self) -> crate::error::Result<VogonConfig> {
        let mut config = VogonConfig::load()?;
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url);
        }
        if let Some(profile) = &self.profile {
            config = config.with_profile(profile);
        }
        Ok(config)
    }
}

/// Backend and credentials shared by the command handlers.
pub struct Context {
    pub config: VogonConfig,
    pub backend: Arc<HttpBackend>,
}

impl Context {
    pub fn new(config: VogonConfig) -> crate::error::Result<Self> {
        let backend = Arc::new(HttpBackend::from_config(&config)?);
        Ok(Self { config, backend })
    }

    pub fn publisher(&self) -> YouTubePublisher {
        YouTubePublisher::new(self.backend.clone(), Arc::new(self.config.credential_store()))
            .with_profile(self.config.profile())
    }
}
