//! Submission history with live status updates.

use greenworld_shared::Waste;

use crate::api_client::ApiClient;
use crate::auth_session::Session;
use crate::config::ClientConfig;
use crate::stores::{shared_feed, SharedFeed};
use crate::ws::{SessionSubscription, WasteTopic};

#[derive(Debug)]
pub struct WasteHistoryView {
    wastes: SharedFeed<Waste>,
    loading: bool,
    subscription: Option<SessionSubscription<WasteTopic>>,
}

impl Default for WasteHistoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl WasteHistoryView {
    pub fn new() -> Self {
        Self {
            wastes: shared_feed(),
            loading: true,
            subscription: None,
        }
    }

    /// Fetch the full history. Failure is logged and leaves the list as is.
    pub async fn load(&mut self, api: &ApiClient) {
        match api.list_wastes().await {
            Ok(wastes) => self.wastes.lock().replace(wastes),
            Err(e) => tracing::error!(error = %e, "failed to fetch wastes"),
        }
        self.loading = false;
    }

    /// Start merging pushed updates for the signed-in user into the list.
    /// The connection follows the session: closed on logout, replaced when
    /// another user signs in.
    pub fn subscribe(&mut self, config: &ClientConfig, session: &Session) {
        let sink = self.wastes.clone();
        self.subscription = Some(SessionSubscription::<WasteTopic>::activate(
            config.cable_url(),
            session,
            move |waste: Waste| {
                if !sink.lock().prepend(waste) {
                    tracing::debug!("ignoring pushed waste already in history");
                }
            },
        ));
    }

    /// Leave the screen: close the live connection.
    pub fn unsubscribe(&mut self) {
        self.subscription = None;
    }

    pub fn subscription(&self) -> Option<&SessionSubscription<WasteTopic>> {
        self.subscription.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn wastes(&self) -> Vec<Waste> {
        self.wastes.snapshot()
    }

    pub fn feed(&self) -> &SharedFeed<Waste> {
        &self.wastes
    }
}
