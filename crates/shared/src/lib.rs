//! Shared types for the Green World client: wire models, the realtime relay
//! protocol, and error types.

pub mod error;
pub mod models;
pub mod protocol;

pub use error::*;
pub use models::*;
pub use protocol::*;
