//! Messages exchanged with the host application.

use super::result::QuizResult;

/// Requests the host sends to the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    /// Persist one attempt (fire-and-forget).
    StoreResult(QuizResult),

    /// Ask for the stored history. Served once per process.
    RequestInitialResults,

    /// Forward a named event to the analytics sink.
    LogEvent(String),
}

/// Notifications the bridge sends back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostNotification {
    /// Full snapshot of stored results. Sent exactly once, possibly empty.
    ResultsLoaded(Vec<QuizResult>),
}
