//! Notification inbox.

use greenworld_shared::Notification;

use crate::api_client::ApiClient;
use crate::auth_session::Session;
use crate::config::ClientConfig;
use crate::stores::{shared_feed, SharedFeed};
use crate::ws::{NotificationTopic, SessionSubscription};

#[derive(Debug, Default)]
pub struct NotificationsView {
    notifications: SharedFeed<Notification>,
    subscription: Option<SessionSubscription<NotificationTopic>>,
}

impl NotificationsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the inbox. Does nothing without a session.
    pub async fn load(&mut self, api: &ApiClient, session: &Session) {
        if !session.is_authenticated() {
            return;
        }
        match api.list_notifications().await {
            Ok(list) => self.notifications.lock().replace(list),
            Err(e) => tracing::error!(error = %e, "failed to fetch notifications"),
        }
    }

    pub fn subscribe(&mut self, config: &ClientConfig, session: &Session) {
        let sink = self.notifications.clone();
        self.subscription = Some(SessionSubscription::<NotificationTopic>::activate(
            config.cable_url(),
            session,
            move |notification: Notification| {
                let id = notification.id;
                if sink.lock().prepend(notification) {
                    tracing::info!(id, "new notification");
                }
            },
        ));
    }

    pub fn unsubscribe(&mut self) {
        self.subscription = None;
    }

    pub fn subscription(&self) -> Option<&SessionSubscription<NotificationTopic>> {
        self.subscription.as_ref()
    }

    /// Mark one notification read on the server, then locally.
    pub async fn mark_read(&mut self, api: &ApiClient, id: u64) -> bool {
        match api.mark_notification_read(id).await {
            Ok(()) => self.notifications.lock().mark_read(id),
            Err(e) => {
                tracing::error!(id, error = %e, "failed to mark notification as read");
                false
            }
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.snapshot()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.lock().unread_count()
    }

    pub fn feed(&self) -> &SharedFeed<Notification> {
        &self.notifications
    }
}
