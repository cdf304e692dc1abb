//! Change notification for session state.

use super::SessionSnapshot;

/// What kind of mutation produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// `login` replaced the whole session.
    LoggedIn,
    /// A refresh replaced the token pair.
    TokensRotated,
    /// Profile fields changed.
    ProfileUpdated,
    /// The session was reset to anonymous.
    Cleared,
}

/// Receives session changes.
///
/// Called synchronously after the mutation has been applied and its lock
/// released, so observers may read the session again.
pub trait SessionObserver: Send + Sync {
    fn on_session_change(&self, event: SessionEvent, snapshot: &SessionSnapshot);
}

impl<F> SessionObserver for F
where
    F: Fn(SessionEvent, &SessionSnapshot) + Send + Sync,
{
    fn on_session_change(&self, event: SessionEvent, snapshot: &SessionSnapshot) {
        self(event, snapshot)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);
