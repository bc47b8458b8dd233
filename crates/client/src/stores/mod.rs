//! Screen-local list state shared with realtime handlers.

pub mod feed;

pub use feed::{shared_feed, Feed, SharedFeed};
