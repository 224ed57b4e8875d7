//! Feed item data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single article pulled from a Google News RSS feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    /// Feed-provided GUID, the deduplication key
    pub guid: String,
    /// Article title (bracket-sanitized for Discord)
    pub title: String,
    /// Resolved article URL (decoded from the Google redirect link)
    pub link: String,
    /// Publication date
    pub published_at: DateTime<Utc>,
    /// Raw RFC 2822 pubDate exactly as it appeared in the feed
    pub pub_date_raw: String,
    /// Related coverage of the same story from other outlets
    #[serde(default)]
    pub related: Vec<RelatedArticle>,
    /// "View Full Coverage" link, when the feed carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_coverage: Option<String>,
}

/// A related-coverage entry from a Google News description cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedArticle {
    /// Article title
    pub title: String,
    /// Resolved article URL
    pub link: String,
    /// Publishing outlet name
    pub press: String,
}

/// A video surfaced by the YouTube Data API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    /// YouTube video ID, the deduplication key
    pub id: String,
    /// Video title (HTML entities unescaped)
    pub title: String,
    /// Uploading channel's display name
    pub channel_title: String,
    /// Upload timestamp
    pub published_at: DateTime<Utc>,
}

impl Video {
    /// Short share URL for the video
    pub fn short_url(&self) -> String {
        format!("https://youtu.be/{}", self.id)
    }
}
