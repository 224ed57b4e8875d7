//! Google News RSS client and article link decoder
//!
//! Fetches Google News RSS feeds (keyword search, top stories, topic feeds)
//! and resolves the redirect links Google puts in them back to the original
//! article URLs. Resolution is offline where possible (the link path carries
//! a base64 blob with the URL inside), with a batchexecute RPC and a plain
//! redirect-follow as fallbacks.

pub mod client;
pub mod decode;
pub mod error;
pub mod feed;
pub mod locale;
pub mod topics;

pub use client::GoogleNewsClient;
pub use decode::{clean_url, decode_article_url, Decoded};
pub use error::GnewsError;
pub use feed::{FeedItem, RawRelated};
pub use locale::CountryConfig;
pub use topics::TopicInfo;
