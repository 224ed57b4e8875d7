//! YouTube Data API v3 client

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use newscord_core::Video;

use crate::error::YouTubeError;

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube Data API client
pub struct YouTubeClient {
    client: Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    channel_title: String,
    published_at: String,
    #[serde(default)]
    resource_id: Option<ResourceId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

impl YouTubeClient {
    /// Create a new client with a Data API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key: api_key.into(),
        }
    }

    /// List a channel's most recent videos, newest first
    pub async fn search_channel_videos(
        &self,
        channel_id: &str,
        max_results: u32,
    ) -> Result<Vec<Video>, YouTubeError> {
        let url = format!("{API_BASE}/search");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("channelId", channel_id),
                ("order", "date"),
                ("type", "video"),
                ("maxResults", &max_results.to_string()),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| YouTubeError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(YouTubeError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| YouTubeError::ParseError(e.to_string()))?;

        let videos: Vec<Video> = body
            .items
            .into_iter()
            .filter_map(|item| {
                let id = item.id.video_id?;
                Some(video_from_snippet(id, item.snippet))
            })
            .collect();

        info!(
            "YouTube search returned {} videos for channel {}",
            videos.len(),
            channel_id
        );
        Ok(videos)
    }

    /// List the videos in a playlist (works for the `UU…` uploads playlist
    /// too, at a fraction of the search quota cost)
    pub async fn playlist_items(
        &self,
        playlist_id: &str,
        max_results: u32,
    ) -> Result<Vec<Video>, YouTubeError> {
        let url = format!("{API_BASE}/playlistItems");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("playlistId", playlist_id),
                ("maxResults", &max_results.to_string()),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| YouTubeError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(YouTubeError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: PlaylistResponse = response
            .json()
            .await
            .map_err(|e| YouTubeError::ParseError(e.to_string()))?;

        let videos = body
            .items
            .into_iter()
            .filter_map(|item| {
                let id = item.snippet.resource_id.as_ref()?.video_id.clone()?;
                Some(video_from_snippet(id, item.snippet))
            })
            .collect();

        Ok(videos)
    }
}

fn video_from_snippet(id: String, snippet: Snippet) -> Video {
    Video {
        id,
        title: unescape_html(&snippet.title),
        channel_title: unescape_html(&snippet.channel_title),
        published_at: parse_published_at(&snippet.published_at),
    }
}

/// Parse the API's RFC 3339 publishedAt, tolerating the legacy form
/// without fractional seconds
fn parse_published_at(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Undo the entity escaping the API applies to titles
fn unescape_html(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}
