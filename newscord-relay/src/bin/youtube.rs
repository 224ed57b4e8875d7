//! YouTube uploads relay
//!
//! Posts a channel's (or playlist's) new uploads to a Discord webhook.
//! A first run seeds the store from a short backlog; later runs only
//! post uploads inside the lookback window.

use newscord_relay::{VideoPipeline, VideoSource, YoutubeConfig};
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

    let config = YoutubeConfig::from_env()?;

    // A playlist poll costs a fraction of the search quota
    let source = match (&config.playlist_id, &config.channel_id) {
        (Some(playlist), _) => VideoSource::Playlist(playlist.clone()),
        (None, Some(channel)) => VideoSource::Channel(channel.clone()),
        (None, None) => {
            anyhow::bail!("YOUTUBE_CHANNEL_ID or YOUTUBE_PLAYLIST_ID is required")
        }
    };

    let store = SeenStore::open(&config.db_path)?;
    let pipeline = VideoPipeline::new(
        store,
        config.discord.clone(),
        config.api_key.clone(),
        config.first_run,
        config.lookback_hours,
    );

    let posted = pipeline.run(&source).await?;
    info!("YouTube relay finished, {} videos posted", posted);
    Ok(())
}
