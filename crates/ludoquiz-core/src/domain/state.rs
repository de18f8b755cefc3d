//! State of the result backend connection.

/// Connection state of the result store.
///
/// State transitions:
/// - Uninitialized -> Opening -> Ready
/// - Uninitialized -> Opening -> Unavailable (terminal, never retried)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// `initialize()` has not been called yet.
    Uninitialized,

    /// The backend is being opened.
    Opening,

    /// Backend open; submissions and scans hit storage.
    Ready,

    /// Backend could not be opened. Store runs as a no-op.
    Unavailable,
}

impl ConnectionState {
    /// Has the open attempt settled (either way)?
    pub fn is_settled(self) -> bool {
        matches!(self, ConnectionState::Ready | ConnectionState::Unavailable)
    }

    /// Can the store move from `self` to `next`?
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Uninitialized, Opening) | (Opening, Ready) | (Opening, Unavailable)
        )
    }
}
