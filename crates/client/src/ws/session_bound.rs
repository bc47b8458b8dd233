//! Subscriptions that follow whoever is signed in.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{oneshot, watch};

use super::subscription::{ConnectionState, Subscription};
use super::topic::Topic;
use crate::auth_session::Session;

struct Live<T: Topic> {
    subject: Option<u64>,
    current: Option<Subscription<T>>,
    closed: bool,
}

impl<T: Topic> Live<T> {
    /// Point the connection at `subject`. Returns false once closed.
    fn follow<H>(&mut self, subject: Option<u64>, url: &str, handler: &Arc<Mutex<H>>) -> bool
    where
        H: FnMut(T::Event) + Send + 'static,
    {
        if self.closed {
            return false;
        }
        let subject = subject.filter(|id| *id != 0);
        if subject == self.subject {
            return true;
        }

        tracing::debug!(
            channel = T::CHANNEL,
            from = ?self.subject,
            to = ?subject,
            "session user changed"
        );
        self.subject = subject;
        // The old connection is fully closed before the new one can deliver.
        self.current = None;

        let handler = Arc::clone(handler);
        self.current = Subscription::activate(url, subject, move |event| {
            let mut handler = handler.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            (*handler)(event)
        });
        true
    }
}

fn lock<T: Topic>(live: &Mutex<Live<T>>) -> MutexGuard<'_, Live<T>> {
    live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A [`Subscription`] bound to the session instead of a fixed user.
///
/// Connects for the signed-in user, closes on logout, and reconnects when a
/// different user signs in. Setting the same user again (a profile refresh)
/// keeps the connection. Dropping it closes everything.
pub struct SessionSubscription<T: Topic> {
    live: Arc<Mutex<Live<T>>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl<T: Topic> SessionSubscription<T> {
    /// Must be called from within a tokio runtime.
    pub fn activate<H>(url: impl Into<String>, session: &Session, handler: H) -> Self
    where
        H: FnMut(T::Event) + Send + 'static,
    {
        let url = url.into();
        let handler = Arc::new(Mutex::new(handler));
        let mut users = session.watch();
        let live = Arc::new(Mutex::new(Live {
            subject: None,
            current: None,
            closed: false,
        }));

        let subject = users.borrow_and_update().as_ref().map(|user| user.id);
        lock(&live).follow(subject, &url, &handler);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let task_live = Arc::clone(&live);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    changed = users.changed() => {
                        if changed.is_err() {
                            // Session is gone; keep whatever is connected.
                            break;
                        }
                        let subject = users.borrow_and_update().as_ref().map(|user| user.id);
                        if !lock(&task_live).follow(subject, &url, &handler) {
                            break;
                        }
                    }
                }
            }
        });

        Self {
            live,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn channel(&self) -> &'static str {
        T::CHANNEL
    }

    /// User the connection currently belongs to.
    pub fn subject(&self) -> Option<u64> {
        lock(&self.live).subject
    }

    /// `None` while nobody is signed in.
    pub fn state(&self) -> Option<ConnectionState> {
        lock(&self.live).current.as_ref().map(Subscription::state)
    }

    pub fn state_changes(&self) -> Option<watch::Receiver<ConnectionState>> {
        lock(&self.live)
            .current
            .as_ref()
            .map(Subscription::state_changes)
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_some_and(|state| state.is_connected())
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_none()
    }

    /// Stop following the session and close the connection. Only the first
    /// call does anything.
    pub fn close(&mut self) {
        let Some(shutdown) = self.shutdown.take() else {
            return;
        };
        let _ = shutdown.send(());

        let mut live = lock(&self.live);
        live.closed = true;
        live.subject = None;
        if let Some(mut current) = live.current.take() {
            current.close();
        }
    }
}

impl<T: Topic> Drop for SessionSubscription<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T: Topic> std::fmt::Debug for SessionSubscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let live = lock(&self.live);
        f.debug_struct("SessionSubscription")
            .field("channel", &T::CHANNEL)
            .field("subject", &live.subject)
            .field("current", &live.current)
            .field("closed", &live.closed)
            .finish()
    }
}
