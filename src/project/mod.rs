//! Projects: configuration, assets, feed import and the open-project session.

pub mod assets;
pub mod config;
pub mod feed;
pub mod session;

pub use assets::{Asset, AssetCatalog, AssetKind};
pub use config::{ConfigState, ProjectConfig};
pub use feed::{spreadsheet_id, FEED_FILE};
pub use session::ProjectSession;

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, VogonError};

fn project_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_]+$").expect("project name validation regex must compile")
    })
}

/// Project names may only contain ASCII letters, digits and underscores.
pub fn validate_project_name(name: &str) -> Result<()> {
    if project_name_pattern().is_match(name) {
        Ok(())
    } else {
        Err(VogonError::Validation(format!(
            "Invalid project name '{name}': use only letters, digits and underscores"
        )))
    }
}

/// Project ids are the backend's sanitized names: one or more letters,
/// digits or underscores (any script). Anything else could alter the request
/// path the id is embedded in.
pub fn validate_project_id(id: &str) -> Result<()> {
    if !id.is_empty() && id.chars().all(|c| c.is_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(VogonError::Validation(format!("Invalid project id '{id}'")))
    }
}
