//! Feed-to-Discord relay
//!
//! Wires the feed clients, the seen-item store and the webhook client
//! into the four relay binaries. Each binary is a one-shot batch run
//! meant to be driven by cron or a workflow scheduler.

pub mod config;
pub mod filter;
pub mod pipeline;

pub use config::{
    ConfigError, DiscordTarget, KeywordConfig, TopConfig, TopicConfig, YoutubeConfig,
};
pub use filter::{AdvancedFilter, DateFilter};
pub use pipeline::{NewsPipeline, NewsPipelineOptions, RelayError, VideoPipeline, VideoSource};
