//! WebSocket infrastructure for the admin review feed.
//!
//! Provides connection management, heartbeat monitoring, and the HTTP
//! upgrade handler that streams the pending verification queue.

mod feed;
mod heartbeat;
pub mod manager;

pub use feed::{pending_feed_handler, pending_feed_message, FeedQuery};
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
