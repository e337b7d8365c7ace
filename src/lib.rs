//! Vogon client
//!
//! Typed client for the Vogon video-ad generation backend. Tracks the status
//! of long-running generation and upload jobs by polling, links a YouTube
//! account through a backend-relayed device-code authorization, and manages
//! projects, their configuration, assets and feeds.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use vogon_client::prelude::*;
//!
//! # async fn example() -> vogon_client::error::Result<()> {
//! let config = VogonConfig::load()?;
//! let backend = Arc::new(HttpBackend::from_config(&config)?);
//! let session = ProjectSession::open(backend, &config, "spring_sale").await?;
//! session.generate_all_videos().await?;
//! let mut updates = session.poller().subscribe(JobKind::Generation);
//! while updates.changed().await.is_ok() {
//!     if let Some(status) = &updates.borrow().last_result {
//!         println!("{}", status.text);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod poller;
pub mod prelude;
pub mod project;
pub mod youtube;

#[cfg(feature = "cli")]
pub mod cli;
