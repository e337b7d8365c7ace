//! Error classification shared by the poller, the auth relay and the CLI.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection failures, timeouts, rate limiting.
    TransientNetwork,
    /// Missing, expired or denied credentials.
    Authorization,
    /// Input rejected by the backend or by client-side checks.
    Validation,
    Server,
    Api,
    Configuration,
    Serialization,
    Unknown,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryLater,
    Reauthorize,
    FixInput,
    CheckConfiguration,
    ReportBug,
}
