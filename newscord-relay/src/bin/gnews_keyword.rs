//! Google News keyword-search relay
//!
//! Posts new results for a search query (or an explicit feed URL) to a
//! Discord webhook. Meant to run as a one-shot job on a schedule.

use newscord_discord::NewsHeader;
use newscord_gnews::{feed, locale, GoogleNewsClient};
use newscord_relay::{KeywordConfig, NewsPipeline, NewsPipelineOptions};
use newscord_store::SeenStore;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = KeywordConfig::from_env()?;

    let (feed_url, category) = match config.search_query() {
        Some(query) => (
            feed::search_feed_url(&query, &config.hl, &config.gl, &config.ceid),
            config.keyword.clone().unwrap_or_default(),
        ),
        None => {
            let url = config
                .rss_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("RSS_URL is required without KEYWORD_MODE"))?;
            // The feed names the search term in its channel title
            let channel = GoogleNewsClient::new(false).fetch_feed(&url).await?;
            let category = feed::search_term_from_title(channel.title())
                .unwrap_or_else(|| "디스코드".to_string());
            (url, category)
        }
    };
    info!("Using feed URL: {}", feed_url);

    let header = NewsHeader::keyword(
        &locale::country_flag(&config.gl),
        locale::news_prefix(&config.hl),
        &category,
        &config.gl,
    );

    let store = SeenStore::open(&config.db_path)?;
    let pipeline = NewsPipeline::new(
        store,
        config.discord.clone(),
        header,
        NewsPipelineOptions {
            origin_links: config.origin_links,
            advanced_filter: config.advanced_filter.clone(),
            date_filter: config.date_filter.clone(),
            lang: config.hl.clone(),
            offset_hours: config.offset_hours,
            initialize: config.initialize,
            topic: None,
        },
    );

    let posted = pipeline.run(&feed_url).await?;
    info!("Keyword relay finished, {} items posted", posted);
    Ok(())
}
