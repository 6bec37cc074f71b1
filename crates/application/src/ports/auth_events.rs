//! Auth event port
//!
//! The authenticated client fires [`AuthEvents::session_expired`] exactly
//! once per failed refresh; the UI collaborator reacts by navigating the
//! user to an unauthenticated entry point.

/// Port for session lifecycle side effects.
pub trait AuthEvents: Send + Sync {
    /// Invoked after a refresh failure has cleared the stored tokens.
    fn session_expired(&self);
}
