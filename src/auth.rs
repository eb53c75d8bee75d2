//! The authentication collaborator.
//!
//! Authentication itself (passwords, sessions, tokens) is handled outside
//! this crate. The rest of the application only consumes "current identity
//! or none" plus a change notification, which is what [AuthSession]
//! provides. Any identity change is treated by subscribers as cause to
//! reload (signed in) or reset (signed out) their state.

use std::sync::Arc;

use tokio::sync::watch;

/// Alias for the integer type used to identify users.
pub type UserId = i64;

/// Holds the currently signed-in identity, if any.
///
/// Cloning the session is cheap; all clones share the same identity.
#[derive(Debug, Clone)]
pub struct AuthSession {
    identity: Arc<watch::Sender<Option<UserId>>>,
}

impl AuthSession {
    /// Create a session with no identity signed in.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);

        Self {
            identity: Arc::new(sender),
        }
    }

    /// Record `user` as the current identity and notify subscribers.
    pub fn sign_in(&self, user: UserId) {
        self.identity.send_replace(Some(user));
    }

    /// Clear the current identity and notify subscribers.
    pub fn sign_out(&self) {
        self.identity.send_replace(None);
    }

    /// The currently signed-in user, or `None`.
    pub fn current(&self) -> Option<UserId> {
        *self.identity.borrow()
    }

    /// Subscribe to identity changes.
    ///
    /// The receiver observes the value at subscription time as well as
    /// every later change.
    pub fn subscribe(&self) -> watch::Receiver<Option<UserId>> {
        self.identity.subscribe()
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}
