//! Discord webhook delivery and message formatting
//!
//! Delivery is a plain webhook execute POST. Formatting turns news items
//! and videos into the content strings the relays post, with bracket
//! sanitizing so titles cannot break Discord's markdown links.

pub mod format;
pub mod webhook;

pub use format::{
    format_timestamp, news_content, related_block, replace_brackets, video_content, NewsHeader,
};
pub use webhook::{WebhookClient, WebhookError, WebhookMessage};
