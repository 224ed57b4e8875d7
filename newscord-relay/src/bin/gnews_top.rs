//! Google News top-stories relay
//!
//! Posts a country's top stories to a Discord webhook with the country's
//! own Google News branding in the header.

use newscord_discord::NewsHeader;
use newscord_gnews::{feed, locale};
use newscord_relay::{NewsPipeline, NewsPipelineOptions, TopConfig};
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

    let config = TopConfig::from_env()?;

    let (feed_url, header, lang) = match &config.country {
        Some(code) => {
            let country = locale::country_config(code)
                .ok_or_else(|| anyhow::anyhow!("Unsupported country code: {code}"))?;
            let header = NewsHeader::top(
                country.brand,
                country.top_label,
                country.name_local,
                &locale::country_flag(country.code),
            );
            (feed::top_feed_url(country), header, country.hl.to_string())
        }
        None => {
            let url = config
                .rss_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("RSS_URL_TOP is required without TOP_MODE"))?;
            let lang = locale::language_from_url(&url);
            (url, NewsHeader::none(), lang)
        }
    };
    info!("Using feed URL: {}", feed_url);

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
            topic: None,
        },
    );

    let posted = pipeline.run(&feed_url).await?;
    info!("Top-stories relay finished, {} items posted", posted);
    Ok(())
}
