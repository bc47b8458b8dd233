//! Green World Client
//!
//! Request plumbing and realtime updates for the Green World waste
//! identification app: the signed-in session, the REST and classifier
//! clients, per-topic relay subscriptions, and the state behind each screen.

pub mod api_client;
pub mod auth_session;
pub mod classifier;
pub mod config;
pub mod image;
pub mod stores;
pub mod views;
pub mod ws;

pub use api_client::ApiClient;
pub use auth_session::Session;
pub use classifier::ClassifierClient;
pub use config::{ClientConfig, ConfigError};
pub use ws::{
    ConnectionState, NotificationTopic, SessionSubscription, Subscription, Topic, WasteTopic,
};
