use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use super::token::TokenSet;

/// Storage abstraction for persisted YouTube credentials.
pub trait CredentialStore: Send + Sync {
    fn load(&self, profile: &str) -> Result<Option<TokenSet>, AuthError>;
    fn save(&self, profile: &str, tokens: &TokenSet) -> Result<(), AuthError>;
    fn clear(&self, profile: &str) -> Result<(), AuthError>;

    /// Merge `update` into the stored tokens and persist the result.
    ///
    /// Read-then-write with no locking across the two steps. Nothing is
    /// written when the update changes no field.
    fn apply_update(&self, profile: &str, update: &TokenSet) -> Result<TokenSet, AuthError> {
        let mut tokens = self.load(profile)?.unwrap_or_default();
        if tokens.merge(update) {
            self.save(profile, &tokens)?;
        }
        Ok(tokens)
    }
}

/// File-backed credential store using one TOML file per profile.
///
/// # Example
/// ```no_run
/// use vogon_client::auth::{CredentialStore, FileCredentialStore, TokenSet};
///
/// let store = FileCredentialStore::new_default();
/// store.save("default", &TokenSet {
///     access_token: Some("access".to_string()),
///     refresh_token: Some("refresh".to_string()),
///     token_type: Some("Bearer".to_string()),
/// })?;
/// # Ok::<(), vogon_client::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    base_dir: PathBuf,
}

impl FileCredentialStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn new_default() -> Self {
        Self::new(crate::config::default_vogon_dir())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn credential_path(&self, profile: &str) -> PathBuf {
        let profile = normalize_label(profile);
        let name = if profile == "default" {
            "youtube.toml".to_string()
        } else {
            format!("youtube.{profile}.toml")
        };
        self.base_dir.join(name)
    }

    fn ensure_parent(path: &Path) -> Result<(), AuthError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self, profile: &str) -> Result<Option<TokenSet>, AuthError> {
        let path = self.credential_path(profile);
        let raw = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        let file: CredentialFile = toml::from_str(&raw)?;
        Ok(Some(file.tokens))
    }

    fn save(&self, profile: &str, tokens: &TokenSet) -> Result<(), AuthError> {
        let path = self.credential_path(profile);
        Self::ensure_parent(&path)?;
        let file = CredentialFile {
            version: 1,
            profile: profile.to_string(),
            tokens: tokens.clone(),
            saved_at: Utc::now(),
        };
        let serialized = toml::to_string(&file)?;
        fs::write(&path, serialized)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn clear(&self, profile: &str) -> Result<(), AuthError> {
        let path = self.credential_path(profile);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Io(err.to_string())),
        }
    }
}

/// Process-local credential store, for sessions that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    tokens: Mutex<HashMap<String, TokenSet>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self, profile: &str) -> Result<Option<TokenSet>, AuthError> {
        let guard = self
            .tokens
            .lock()
            .map_err(|_| AuthError::Io("credential store lock poisoned".to_string()))?;
        Ok(guard.get(profile).cloned())
    }

    fn save(&self, profile: &str, tokens: &TokenSet) -> Result<(), AuthError> {
        let mut guard = self
            .tokens
            .lock()
            .map_err(|_| AuthError::Io("credential store lock poisoned".to_string()))?;
        guard.insert(profile.to_string(), tokens.clone());
        Ok(())
    }

    fn clear(&self, profile: &str) -> Result<(), AuthError> {
        let mut guard = self
            .tokens
            .lock()
            .map_err(|_| AuthError::Io("credential store lock poisoned".to_string()))?;
        guard.remove(profile);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialFile {
    version: u32,
    profile: String,
    tokens: TokenSet,
    saved_at: DateTime<Utc>,
}

fn normalize_label(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "default".to_string();
    }
    let out: String = trimmed
        .chars()
        .map(|ch| {
            let lower = ch.to_ascii_lowercase();
            if lower.is_ascii_alphanumeric() || lower == '-' {
                lower
            } else {
                '-'
            }
        })
        .collect();
    if out.trim_matches('-').is_empty() {
        "default".to_string()
    } else {
        out
    }
}
