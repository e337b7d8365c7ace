//! Device-code authorization relayed through the backend.

mod support;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use vogon_client::auth::{
    AuthError, CheckOutcome, CredentialStore, DeviceAuthRelay, DeviceAuthStatus,
    FileCredentialStore, MemoryCredentialStore, RelayState, TokenSet,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{backend, tokens};

const DEVICE_CODE_PATH: &str = "/api/youtube_auth/get_device_code";
const CHECK_PATH: &str = "/api/youtube_auth/check_device_authorization";

async fn mount_device_code(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(DEVICE_CODE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "device-123",
            "user_code": "ABCD-EFGH",
            "verification_url": "https://www.google.com/device",
            "expires_in": 1800,
            "interval": 5
        })))
        .mount(server)
        .await;
}

async fn mount_check(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(CHECK_PATH))
        .and(body_json(json!({ "code": "device-123" })))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

fn relay(server: &MockServer, store: Arc<dyn CredentialStore>) -> DeviceAuthRelay {
    DeviceAuthRelay::new(backend(server), store)
}

#[tokio::test]
async fn begin_exposes_user_code_and_awaits_approval() {
    let server = MockServer::start().await;
    mount_device_code(&server).await;

    let mut relay = relay(&server, Arc::new(MemoryCredentialStore::new()));
    assert_eq!(relay.state(), &RelayState::Idle);

    let session = relay.begin().await.expect("device code").clone();
    assert_eq!(session.user_code, "ABCD-EFGH");
    assert_eq!(session.verification_url, "https://www.google.com/device");
    assert_eq!(session.device_code, "device-123");
    assert_eq!(session.status, DeviceAuthStatus::Pending);
    assert_eq!(relay.state(), &RelayState::AwaitingApproval);
}

#[tokio::test]
async fn begin_failure_returns_to_idle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DEVICE_CODE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "The OAuth client was not found."
        })))
        .mount(&server)
        .await;

    let mut relay = relay(&server, Arc::new(MemoryCredentialStore::new()));
    let err = relay.begin().await.unwrap_err();
    assert!(
        matches!(&err, AuthError::InvalidResponse(msg) if msg.contains("The OAuth client was not found.")),
        "unexpected error: {err:?}"
    );
    assert_eq!(relay.state(), &RelayState::Idle);
    assert!(relay.session().is_none());
}

#[tokio::test]
async fn check_without_begin_is_invalid_state() {
    let server = MockServer::start().await;
    let mut relay = relay(&server, Arc::new(MemoryCredentialStore::new()));
    assert!(matches!(
        relay.check().await,
        Err(AuthError::InvalidState(_))
    ));
}

#[tokio::test]
async fn pending_check_keeps_waiting() {
    let server = MockServer::start().await;
    mount_device_code(&server).await;
    mount_check(
        &server,
        428,
        json!({ "error": "authorization_pending", "error_description": "Precondition Required" }),
    )
    .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let mut relay = relay(&server, store.clone());
    relay.begin().await.unwrap();

    assert_eq!(
        relay.check().await.unwrap(),
        CheckOutcome::Pending {
            description: Some("Precondition Required".to_string())
        }
    );
    assert_eq!(relay.state(), &RelayState::AwaitingApproval);
    assert!(store.load("default").unwrap().is_none());
}

#[tokio::test]
async fn approval_persists_all_tokens() {
    let server = MockServer::start().await;
    mount_device_code(&server).await;
    mount_check(
        &server,
        200,
        json!({
            "access_token": "ya29.access",
            "refresh_token": "1//refresh",
            "token_type": "Bearer",
            "expires_in": 3599
        }),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileCredentialStore::new(dir.path()));
    let mut relay = relay(&server, store.clone());
    relay.begin().await.unwrap();

    let outcome = relay.check().await.unwrap();
    let expected = TokenSet {
        access_token: Some("ya29.access".to_string()),
        refresh_token: Some("1//refresh".to_string()),
        token_type: Some("Bearer".to_string()),
    };
    assert_eq!(outcome, CheckOutcome::Approved(expected.clone()));
    assert_eq!(relay.state(), &RelayState::Approved);
    assert_eq!(store.load("default").unwrap(), Some(expected));
    assert_eq!(
        relay.session().map(|session| session.status),
        Some(DeviceAuthStatus::Approved)
    );
}

#[tokio::test]
async fn partial_approval_only_overwrites_fields_present() {
    let server = MockServer::start().await;
    mount_device_code(&server).await;
    mount_check(&server, 200, json!({ "access_token": "fresh-access" })).await;

    let store = Arc::new(MemoryCredentialStore::new());
    store.save("default", &tokens("stale-access", "kept-refresh")).unwrap();
    let mut relay = relay(&server, store.clone());
    relay.begin().await.unwrap();

    relay.check().await.unwrap();
    let stored = store.load("default").unwrap().unwrap();
    assert_eq!(stored.access_token.as_deref(), Some("fresh-access"));
    assert_eq!(stored.refresh_token.as_deref(), Some("kept-refresh"));
    assert_eq!(stored.token_type.as_deref(), Some("Bearer"));
}

#[tokio::test]
async fn denial_surfaces_description_and_leaves_tokens_unset() {
    let server = MockServer::start().await;
    mount_device_code(&server).await;
    mount_check(
        &server,
        403,
        json!({ "error": "access_denied", "error_description": "Forbidden" }),
    )
    .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let mut relay = relay(&server, store.clone());
    relay.begin().await.unwrap();

    assert_eq!(
        relay.check().await.unwrap(),
        CheckOutcome::Denied {
            description: "Forbidden".to_string()
        }
    );
    assert_eq!(
        relay.state(),
        &RelayState::Denied {
            description: "Forbidden".to_string()
        }
    );
    assert!(store.load("default").unwrap().is_none());

    // Terminal until a new code is requested.
    assert!(matches!(
        relay.check().await,
        Err(AuthError::InvalidState(_))
    ));
    relay.begin().await.unwrap();
    assert_eq!(relay.state(), &RelayState::AwaitingApproval);
}

#[tokio::test]
async fn transport_failure_keeps_session_awaiting_approval() {
    let server = MockServer::builder().start().await;
    mount_device_code(&server).await;

    let mut relay = relay(&server, Arc::new(MemoryCredentialStore::new()));
    relay.begin().await.unwrap();
    drop(server);

    assert!(matches!(relay.check().await, Err(AuthError::Network(_))));
    assert_eq!(relay.state(), &RelayState::AwaitingApproval);
}

#[tokio::test]
async fn profile_selects_credential_slot() {
    let server = MockServer::start().await;
    mount_device_code(&server).await;
    mount_check(
        &server,
        200,
        json!({ "access_token": "a", "refresh_token": "r" }),
    )
    .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let mut relay = relay(&server, store.clone()).with_profile("work");
    relay.begin().await.unwrap();
    relay.check().await.unwrap();

    assert!(store.load("default").unwrap().is_none());
    assert_eq!(
        store.load("work").unwrap().and_then(|t| t.access_token),
        Some("a".to_string())
    );
}
