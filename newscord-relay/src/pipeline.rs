//! Feed-to-webhook pipelines
//!
//! One run fetches a feed, posts everything new to the webhook and
//! records it in the store. Initialize mode resets the store first and
//! replays the whole feed without the per-post pacing delay.

use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use newscord_core::{NewsItem, RelatedArticle};
use newscord_discord::{
    news_content, related_block, format_timestamp, replace_brackets, video_content, NewsHeader,
    WebhookClient, WebhookError, WebhookMessage,
};
use newscord_gnews::{feed, GnewsError, GoogleNewsClient};
use newscord_store::{SeenStore, StoreError};
use newscord_youtube::{YouTubeClient, YouTubeError};

use crate::config::DiscordTarget;
use crate::filter::{AdvancedFilter, DateFilter};

/// Pause between posts so a busy feed does not trip Discord rate limits
const POST_PACING: Duration = Duration::from_secs(3);

/// Errors from a pipeline run
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Feed error: {0}")]
    Feed(#[from] GnewsError),

    #[error("YouTube error: {0}")]
    YouTube(#[from] YouTubeError),

    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Behavior knobs shared by the three news binaries
pub struct NewsPipelineOptions {
    /// Resolve Google redirect links to the original article URLs
    pub origin_links: bool,
    /// Include/exclude term query, empty to disable
    pub advanced_filter: String,
    /// Date filter query, empty to disable
    pub date_filter: String,
    /// Feed language, drives header and date localization
    pub lang: String,
    /// UTC offset hours for rendered dates
    pub offset_hours: i32,
    /// Reset the store and replay the whole feed
    pub initialize: bool,
    /// Topic keyword recorded with each item, when known
    pub topic: Option<String>,
}

/// Google News feed to Discord webhook pipeline
pub struct NewsPipeline {
    gnews: GoogleNewsClient,
    webhook: WebhookClient,
    store: SeenStore,
    target: DiscordTarget,
    header: NewsHeader,
    advanced: AdvancedFilter,
    dates: DateFilter,
    lang: String,
    offset_hours: i32,
    initialize: bool,
    topic: Option<String>,
}

impl NewsPipeline {
    pub fn new(
        store: SeenStore,
        target: DiscordTarget,
        header: NewsHeader,
        options: NewsPipelineOptions,
    ) -> Self {
        Self {
            gnews: GoogleNewsClient::new(options.origin_links),
            webhook: WebhookClient::new(),
            store,
            target,
            header,
            advanced: AdvancedFilter::parse(&options.advanced_filter),
            dates: DateFilter::parse(&options.date_filter),
            lang: options.lang,
            offset_hours: options.offset_hours,
            initialize: options.initialize,
            topic: options.topic,
        }
    }

    /// Run one pass over the feed, returning the number of posts made
    pub async fn run(&self, feed_url: &str) -> Result<usize, RelayError> {
        if self.initialize {
            self.store.reset()?;
        }

        let channel = self.gnews.fetch_feed(feed_url).await?;
        let items = feed::parse_channel(&channel);
        info!("Fetched {} items from {}", items.len(), feed_url);

        let mut posted = 0;
        for item in items {
            if !self.initialize && self.store.is_news_posted(&item.guid)? {
                continue;
            }

            let title = replace_brackets(&item.title);
            let link = self.gnews.resolve_article_url(&item.link).await;

            if !self.dates.matches(item.published_at) {
                info!("Skipping item outside the date filter: {}", title);
                continue;
            }

            let mut related = Vec::with_capacity(item.related.len());
            for raw in &item.related {
                related.push(RelatedArticle {
                    title: raw.title.clone(),
                    link: self.gnews.resolve_article_url(&raw.link).await,
                    press: raw.press.clone(),
                });
            }

            if !self.advanced.is_empty() {
                let haystack = search_haystack(&title, &item.description);
                if !self.advanced.matches(&haystack) {
                    info!("Skipping item rejected by the term filter: {}", title);
                    continue;
                }
            }

            let news = NewsItem {
                guid: item.guid,
                title,
                link,
                published_at: item.published_at,
                pub_date_raw: item.pub_date_raw,
                related,
                full_coverage: item.full_coverage,
            };

            let block = related_block(&news.related, news.full_coverage.as_deref(), &self.lang);
            let date = format_timestamp(news.published_at, self.offset_hours, &self.lang);
            let content = news_content(&self.header, &news.title, &news.link, block.as_deref(), &date);

            self.webhook
                .execute(
                    &self.target.webhook_url,
                    &WebhookMessage::new(
                        content,
                        self.target.username.clone(),
                        self.target.avatar_url.clone(),
                    ),
                )
                .await?;
            self.store.record_news(&news, self.topic.as_deref())?;
            posted += 1;

            if !self.initialize {
                tokio::time::sleep(POST_PACING).await;
            }
        }

        info!("Posted {} new items", posted);
        Ok(posted)
    }
}

/// Where the video pipeline pulls uploads from
pub enum VideoSource {
    /// Poll a channel through the search endpoint
    Channel(String),
    /// Poll a playlist, e.g. the channel's `UU…` uploads playlist
    Playlist(String),
}

/// YouTube uploads to Discord webhook pipeline
pub struct VideoPipeline {
    youtube: YouTubeClient,
    webhook: WebhookClient,
    store: SeenStore,
    target: DiscordTarget,
    first_run: bool,
    lookback_hours: i64,
}

impl VideoPipeline {
    pub fn new(
        store: SeenStore,
        target: DiscordTarget,
        api_key: impl Into<String>,
        first_run: bool,
        lookback_hours: i64,
    ) -> Self {
        Self {
            youtube: YouTubeClient::new(api_key),
            webhook: WebhookClient::new(),
            store,
            target,
            first_run,
            lookback_hours,
        }
    }

    /// Run one pass over the source, returning the number of posts made
    pub async fn run(&self, source: &VideoSource) -> Result<usize, RelayError> {
        let max_results = batch_size(self.first_run);
        let mut videos = match source {
            VideoSource::Channel(id) => {
                self.youtube.search_channel_videos(id, max_results).await?
            }
            VideoSource::Playlist(id) => self.youtube.playlist_items(id, max_results).await?,
        };
        // The API lists newest first; post oldest first
        videos.reverse();

        let now = Utc::now();
        let mut posted = 0;
        for video in videos {
            if !self.first_run {
                if self.store.is_video_posted(&video.id)? {
                    continue;
                }
                if now - video.published_at > chrono::Duration::hours(self.lookback_hours) {
                    info!("Skipping video outside the lookback window: {}", video.id);
                    continue;
                }
            }

            self.webhook
                .execute(
                    &self.target.webhook_url,
                    &WebhookMessage::new(
                        video_content(&video),
                        self.target.username.clone(),
                        self.target.avatar_url.clone(),
                    ),
                )
                .await?;
            if let Err(e) = self.store.record_video(&video) {
                warn!("Failed to record posted video {}: {}", video.id, e);
            }
            posted += 1;
        }

        info!("Posted {} new videos", posted);
        Ok(posted)
    }
}

/// A first run seeds from a short backlog; later runs look at a larger
/// page but only post within the lookback window
fn batch_size(first_run: bool) -> u32 {
    if first_run {
        15
    } else {
        30
    }
}

/// Text the term filter matches against: the title plus the description
/// with its markup stripped
fn search_haystack(title: &str, description_html: &str) -> String {
    let description = feed::strip_html(description_html);
    if description.is_empty() {
        title.to_string()
    } else {
        format!("{title} {description}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_size() {
        assert_eq!(batch_size(true), 15);
        assert_eq!(batch_size(false), 30);
    }

    #[test]
    fn test_search_haystack_includes_description_text() {
        let haystack = search_haystack(
            "Main title",
            r#"<ol><li><a href="https://x">Related story</a></li></ol>"#,
        );
        assert_eq!(haystack, "Main title Related story");
        assert_eq!(search_haystack("Only title", ""), "Only title");
    }

    #[test]
    fn test_term_filter_sees_related_coverage() {
        let filter = AdvancedFilter::parse("+galaxy");
        let haystack = search_haystack(
            "Samsung event",
            r#"<li><a href="https://x">Galaxy S26 hands on</a></li>"#,
        );
        assert!(filter.matches(&haystack));
    }
}
