//! Google News topic-feed relay
//!
//! Posts new items from a topic feed (headlines, sports, technology and
//! so on) to a Discord webhook, with a localized topic header.

use newscord_discord::NewsHeader;
use newscord_gnews::{feed, locale, topics};
use newscord_relay::{NewsPipeline, NewsPipelineOptions, TopicConfig};
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

    let config = TopicConfig::from_env()?;

    let feed_url = match &config.topic_keyword {
        Some(keyword) => {
            let topic = topics::topic_by_keyword(keyword)
                .ok_or_else(|| anyhow::anyhow!("Unknown topic keyword: {keyword}"))?;
            // The feed language picks the per-language topic ID
            let lang = lang_from_params(&config.topic_params);
            let id = topic
                .id_for(&lang)
                .ok_or_else(|| anyhow::anyhow!("No feed ID for topic {keyword}"))?;
            feed::topic_feed_url(id, &config.topic_params)
        }
        None => config
            .rss_url
            .clone()
            .ok_or_else(|| anyhow::anyhow!("RSS_URL_TOPIC is required without TOPIC_MODE"))?,
    };
    info!("Using feed URL: {}", feed_url);

    let lang = locale::language_from_url(&feed_url);
    let flag = locale::country_flag(&locale::country_from_url(&feed_url).unwrap_or_default());

    let topic_id = topics::topic_id_from_url(&feed_url)
        .ok_or_else(|| anyhow::anyhow!("Feed URL carries no topic ID: {feed_url}"))?;
    let resolved = topics::resolve_topic(&topic_id, &lang);
    info!("Resolved topic: {} ({})", resolved.name, resolved.category);

    let header = NewsHeader::topic(
        locale::news_prefix(&lang),
        &resolved.category,
        &resolved.name,
        &flag,
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
            lang,
            offset_hours: config.offset_hours,
            initialize: config.initialize,
            topic: resolved.keyword.map(|k| k.to_string()),
        },
    );

    let posted = pipeline.run(&feed_url).await?;
    info!("Topic relay finished, {} items posted", posted);
    Ok(())
}

/// The `hl` language out of bare topic params like `hl=ko&gl=KR&ceid=...`
fn lang_from_params(params: &str) -> String {
    locale::language_from_url(&format!("?{}", params.trim_start_matches('?')))
}
