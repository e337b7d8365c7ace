//! Tests for the error system.

use vogon_client::auth::AuthError;
use vogon_client::error::*;

#[test]
fn error_api_creation() {
    let err = VogonError::api(404, "Not found");
    assert!(matches!(&err, VogonError::Api { status: 404, .. }));
    assert_eq!(err.to_string(), "API error (status 404): Not found");
}

#[test]
fn error_helper_mappings_are_stable_for_major_variants() {
    struct Case {
        error: VogonError,
        expected_category: ErrorCategory,
        expected_retryable: bool,
        expected_recovery: RecoverySuggestion,
    }

    let network_error = reqwest::Client::new()
        .get("http://[::1")
        .build()
        .unwrap_err();
    let serde_error = serde_json::from_str::<serde_json::Value>("{not-json}").unwrap_err();

    let cases = vec![
        Case {
            error: VogonError::Network(network_error),
            expected_category: ErrorCategory::TransientNetwork,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryLater,
        },
        Case {
            error: VogonError::Authentication("expired".to_string()),
            expected_category: ErrorCategory::Authorization,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::Reauthorize,
        },
        Case {
            error: VogonError::Validation("bad name".to_string()),
            expected_category: ErrorCategory::Validation,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::FixInput,
        },
        Case {
            error: VogonError::Configuration("bad url".to_string()),
            expected_category: ErrorCategory::Configuration,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckConfiguration,
        },
        Case {
            error: VogonError::api(503, "down"),
            expected_category: ErrorCategory::Server,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryLater,
        },
        Case {
            error: VogonError::api(429, "slow down"),
            expected_category: ErrorCategory::TransientNetwork,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryLater,
        },
        Case {
            error: VogonError::api(403, "forbidden"),
            expected_category: ErrorCategory::Authorization,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::Reauthorize,
        },
        Case {
            error: VogonError::api(404, "missing"),
            expected_category: ErrorCategory::Api,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ReportBug,
        },
        Case {
            error: VogonError::Serialization(serde_error),
            expected_category: ErrorCategory::Serialization,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ReportBug,
        },
    ];

    for case in cases {
        assert_eq!(case.error.category(), case.expected_category, "{}", case.error);
        assert_eq!(case.error.is_retryable(), case.expected_retryable, "{}", case.error);
        assert_eq!(
            case.error.recovery_suggestion(),
            case.expected_recovery,
            "{}",
            case.error
        );
    }
}

#[test]
fn validation_error_displays_message_verbatim() {
    let err = VogonError::Validation("A project with name 'shoes' already exists".to_string());
    assert_eq!(err.to_string(), "A project with name 'shoes' already exists");
}

#[test]
fn auth_errors_convert_by_meaning() {
    assert!(matches!(
        VogonError::from(AuthError::NotLoggedIn),
        VogonError::Authentication(_)
    ));
    assert!(matches!(
        VogonError::from(AuthError::AccessDenied("Forbidden".to_string())),
        VogonError::AuthorizationDenied(msg) if msg == "Forbidden"
    ));
    assert!(matches!(
        VogonError::from(AuthError::InvalidState("no session".to_string())),
        VogonError::InvalidState(_)
    ));
}

#[test]
fn status_to_error_maps_auth_statuses() {
    use vogon_client::api::status_to_error;
    assert!(matches!(status_to_error(403, "no"), VogonError::Authentication(_)));
    assert!(matches!(status_to_error(502, "bad gateway"), VogonError::Api { status: 502, .. }));
}
