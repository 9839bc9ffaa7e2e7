//! External data: the feed, the backend endpoints, and synthetic samples.

pub mod api;
pub mod feed;
pub mod sample;

pub use api::{ApiClient, ChatReply, ChatRoute};
pub use feed::{FEED_PATH, feed_url, read_feed};
pub use sample::{SampleSpec, generate_feed};
