//! Authentication session: the signed-in user, held in memory only.

use std::sync::Arc;

use greenworld_shared::User;
use tokio::sync::watch;

/// Process-wide holder of at most one signed-in user.
///
/// Create one at startup and hand clones to whatever needs it; all clones
/// share the same slot. Nothing here talks to the network.
#[derive(Clone, Debug)]
pub struct Session {
    user: Arc<watch::Sender<Option<User>>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// An empty session.
    pub fn new() -> Self {
        let (user, _) = watch::channel(None);
        Self {
            user: Arc::new(user),
        }
    }

    pub fn get(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    /// Replace the current user wholesale (login).
    pub fn set(&self, user: User) {
        tracing::debug!(user_id = user.id, "session set");
        self.user.send_replace(Some(user));
    }

    /// Forget the current user (logout).
    pub fn clear(&self) {
        if self.user.send_replace(None).is_some() {
            tracing::debug!("session cleared");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.borrow().is_some()
    }

    pub fn user_id(&self) -> Option<u64> {
        self.user.borrow().as_ref().map(|u| u.id)
    }

    /// Observe login and logout.
    pub fn watch(&self) -> watch::Receiver<Option<User>> {
        self.user.subscribe()
    }
}
