use std::sync::Arc;

use crate::api::{DeviceAuthApi, DeviceAuthorization, DeviceCode};

use super::error::AuthError;
use super::store::CredentialStore;
use super::token::TokenSet;

/// Status of a device-code session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAuthStatus {
    Pending,
    Approved,
    Denied,
}

/// A device-code authorization in progress.
///
/// The user visits `verification_url` on any device and enters `user_code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAuthSession {
    pub device_code: String,
    pub verification_url: String,
    pub user_code: String,
    pub status: DeviceAuthStatus,
    /// Tokens received on approval. The credential store holds the merged copy.
    pub tokens: Option<TokenSet>,
}

impl From<DeviceCode> for DeviceAuthSession {
    fn from(code: DeviceCode) -> Self {
        Self {
            device_code: code.device_code,
            verification_url: code.verification_url,
            user_code: code.user_code,
            status: DeviceAuthStatus::Pending,
            tokens: None,
        }
    }
}

/// Relay state: `Idle -> Requesting -> AwaitingApproval -> {Approved, Denied}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayState {
    Idle,
    Requesting,
    AwaitingApproval,
    Approved,
    Denied { description: String },
}

/// Result of one explicit approval check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Not approved yet; check again later. Carries the backend's message
    /// for the user, when it sent one.
    Pending { description: Option<String> },
    /// Approved. Carries the stored credentials after merging the new tokens.
    Approved(TokenSet),
    /// The backend reported an error; show `description` to the user as is.
    Denied { description: String },
}

/// Device-code authorization relayed through the backend.
///
/// Checks are explicit: the relay never polls on its own, and a pending
/// session never times out.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use vogon_client::api::HttpBackend;
/// use vogon_client::auth::{CheckOutcome, DeviceAuthRelay, MemoryCredentialStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = Arc::new(HttpBackend::new("http://localhost:8080")?);
/// let mut relay = DeviceAuthRelay::new(backend, Arc::new(MemoryCredentialStore::new()));
/// let session = relay.begin().await?;
/// println!("Visit {} and enter {}", session.verification_url, session.user_code);
/// // ...after the user confirms they approved:
/// match relay.check().await? {
///     CheckOutcome::Approved(_) => println!("linked"),
///     CheckOutcome::Pending { description } => {
///         println!("not yet: {}", description.as_deref().unwrap_or("waiting"))
///     }
///     CheckOutcome::Denied { description } => println!("{description}"),
/// }
/// # Ok(())
/// # }
/// ```
pub struct DeviceAuthRelay {
    api: Arc<dyn DeviceAuthApi>,
    store: Arc<dyn CredentialStore>,
    profile: String,
    state: RelayState,
    session: Option<DeviceAuthSession>,
}

impl DeviceAuthRelay {
    pub fn new(api: Arc<dyn DeviceAuthApi>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            api,
            store,
            profile: crate::config::DEFAULT_PROFILE.to_string(),
            state: RelayState::Idle,
            session: None,
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    pub fn state(&self) -> &RelayState {
        &self.state
    }

    pub fn session(&self) -> Option<&DeviceAuthSession> {
        self.session.as_ref()
    }

    /// Request a new device/user code pair, discarding any previous session.
    ///
    /// On failure the relay returns to `Idle`.
    pub async fn begin(&mut self) -> Result<&DeviceAuthSession, AuthError> {
        self.state = RelayState::Requesting;
        self.session = None;
        match self.api.request_device_code().await {
            Ok(code) => {
                tracing::info!(verification_url = %code.verification_url, "device code issued");
                self.state = RelayState::AwaitingApproval;
                Ok(self.session.insert(DeviceAuthSession::from(code)))
            }
            Err(err) => {
                self.state = RelayState::Idle;
                Err(err)
            }
        }
    }

    /// Ask the backend once whether the user approved the device code.
    ///
    /// Transport failures leave the session awaiting approval so the caller
    /// can check again.
    pub async fn check(&mut self) -> Result<CheckOutcome, AuthError> {
        if self.state != RelayState::AwaitingApproval {
            return Err(AuthError::InvalidState(format!(
                "no device code awaiting approval (state: {:?})",
                self.state
            )));
        }
        let device_code = match &self.session {
            Some(session) => session.device_code.clone(),
            None => {
                return Err(AuthError::InvalidState(
                    "awaiting approval without a session".to_string(),
                ))
            }
        };

        match self.api.check_device_authorization(&device_code).await? {
            DeviceAuthorization::Pending { description } => {
                tracing::debug!(?description, "device authorization still pending");
                Ok(CheckOutcome::Pending { description })
            }
            DeviceAuthorization::Granted(tokens) => {
                let stored = self.store.apply_update(&self.profile, &tokens)?;
                if let Some(session) = self.session.as_mut() {
                    session.status = DeviceAuthStatus::Approved;
                    session.tokens = Some(tokens);
                }
                self.state = RelayState::Approved;
                tracing::info!(profile = %self.profile, "device authorization approved");
                Ok(CheckOutcome::Approved(stored))
            }
            DeviceAuthorization::Denied { description } => {
                if let Some(session) = self.session.as_mut() {
                    session.status = DeviceAuthStatus::Denied;
                }
                self.state = RelayState::Denied {
                    description: description.clone(),
                };
                tracing::info!(%description, "device authorization denied");
                Ok(CheckOutcome::Denied { description })
            }
        }
    }

    /// Drop the current session and return to `Idle`.
    pub fn reset(&mut self) {
        self.state = RelayState::Idle;
        self.session = None;
    }
}
