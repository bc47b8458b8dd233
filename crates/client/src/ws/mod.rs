//! Realtime subscriptions to the backend relay.
//!
//! Each screen that wants live updates activates one [`Subscription`] per
//! topic it cares about. The subscription owns a single socket, sends one
//! subscribe command once the socket is open, and forwards every payload that
//! matches the topic's shape to the screen's handler.
//!
//! ```text
//!   screen ──activate──▶ Subscription<T> ──spawn──▶ connection task
//!                              ▲                         │
//!                              │ handler(event)          │ connect, subscribe
//!                              └──── route::<T>() ◀──────┘ read frames
//! ```
//!
//! Screens use [`SessionSubscription`], which keeps one [`Subscription`]
//! pointed at the signed-in user: logout closes it, a new user replaces it.
//!
//! Keep-alive pings and subscription acks are consumed here; malformed frames
//! are logged and skipped without dropping the socket.
//!
//! # Usage
//!
//! ```rust,ignore
//! let feed = shared_feed::<Waste>();
//! let sink = feed.clone();
//! let sub = Subscription::<WasteTopic>::activate(config.cable_url(), session.user_id(), move |w| {
//!     sink.lock().prepend(w);
//! });
//! // ... dropping `sub` closes the socket.
//! ```

mod session_bound;
mod subscription;
mod topic;

pub use session_bound::SessionSubscription;
pub use subscription::{ConnectionState, Subscription};
pub use topic::{NotificationTopic, Topic, WasteTopic};
