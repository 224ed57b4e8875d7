//! Environment configuration for the relay binaries
//!
//! Each binary has its own variable namespace, mirroring one cron job
//! per webhook. Parsing is factored over a key→value lookup so the
//! validation rules are testable without touching the process
//! environment; `from_env` passes `std::env::var`.

use std::env;

use chrono::NaiveDate;

/// Webhook destination with optional identity overrides
#[derive(Debug, Clone)]
pub struct DiscordTarget {
    /// Webhook URL
    pub webhook_url: String,
    /// Override the webhook's display name
    pub username: Option<String>,
    /// Override the webhook's avatar
    pub avatar_url: Option<String>,
}

/// Configuration for the keyword-search relay
#[derive(Debug, Clone)]
pub struct KeywordConfig {
    pub discord: DiscordTarget,
    /// Drop and refill the store, posting everything in the feed
    pub initialize: bool,
    /// Search keyword (keyword mode); otherwise `rss_url` is used
    pub keyword: Option<String>,
    /// Explicit feed URL (non-keyword mode)
    pub rss_url: Option<String>,
    /// `when:` recency token appended to the query (e.g. `1d`)
    pub when: Option<String>,
    /// `after:` date token
    pub after_date: Option<String>,
    /// `before:` date token
    pub before_date: Option<String>,
    pub hl: String,
    pub gl: String,
    pub ceid: String,
    pub advanced_filter: String,
    pub date_filter: String,
    /// Resolve Google links to the original article URL
    pub origin_links: bool,
    pub db_path: String,
    /// UTC offset hours for rendered dates
    pub offset_hours: i32,
}

/// Configuration for the topic-feed relay
#[derive(Debug, Clone)]
pub struct TopicConfig {
    pub discord: DiscordTarget,
    pub initialize: bool,
    /// Known topic keyword (topic mode); otherwise `rss_url` is used
    pub topic_keyword: Option<String>,
    /// Locale params for topic mode, e.g. `hl=ko&gl=KR&ceid=KR%3Ako`
    pub topic_params: String,
    /// Explicit topic feed URL (non-topic mode)
    pub rss_url: Option<String>,
    pub advanced_filter: String,
    pub date_filter: String,
    pub origin_links: bool,
    pub db_path: String,
    pub offset_hours: i32,
}

/// Configuration for the top-stories relay
#[derive(Debug, Clone)]
pub struct TopConfig {
    pub discord: DiscordTarget,
    pub initialize: bool,
    /// Country code for top mode; otherwise `rss_url` is used
    pub country: Option<String>,
    /// Explicit feed URL (non-top mode)
    pub rss_url: Option<String>,
    pub advanced_filter: String,
    pub date_filter: String,
    pub origin_links: bool,
    pub db_path: String,
    pub offset_hours: i32,
}

/// Configuration for the YouTube relay
#[derive(Debug, Clone)]
pub struct YoutubeConfig {
    pub discord: DiscordTarget,
    pub api_key: String,
    /// Channel to poll via the search endpoint
    pub channel_id: Option<String>,
    /// Playlist to poll instead of the channel search
    pub playlist_id: Option<String>,
    /// First run: larger backlog allowed, recency window skipped
    pub first_run: bool,
    /// Only post videos newer than this many hours (non-first runs)
    pub lookback_hours: i64,
    pub db_path: String,
}

impl KeywordConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let discord = discord_target(lookup, "DISCORD_WEBHOOK_KEYWORD", "KEYWORD")?;

        let keyword_mode = parse_bool(lookup("KEYWORD_MODE"), false);
        let keyword = non_empty(lookup("KEYWORD"));
        let rss_url = non_empty(lookup("RSS_URL"));

        if keyword_mode && keyword.is_none() {
            return Err(ConfigError::Missing("KEYWORD"));
        }
        if !keyword_mode && rss_url.is_none() {
            return Err(ConfigError::Missing("RSS_URL"));
        }

        let when = non_empty(lookup("WHEN"));
        let after_date = non_empty(lookup("AFTER_DATE"));
        let before_date = non_empty(lookup("BEFORE_DATE"));

        for (name, value) in [("AFTER_DATE", &after_date), ("BEFORE_DATE", &before_date)] {
            if let Some(date) = value {
                if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                    return Err(ConfigError::Invalid {
                        field: name,
                        message: format!("expected YYYY-MM-DD, got '{date}'"),
                    });
                }
            }
        }
        if when.is_some() && (after_date.is_some() || before_date.is_some()) {
            return Err(ConfigError::Conflict(
                "WHEN cannot be combined with AFTER_DATE/BEFORE_DATE",
            ));
        }

        let hl = non_empty(lookup("HL"));
        let gl = non_empty(lookup("GL"));
        let ceid = non_empty(lookup("CEID"));
        let locale_set = [&hl, &gl, &ceid].iter().filter(|v| v.is_some()).count();
        if locale_set != 0 && locale_set != 3 {
            return Err(ConfigError::Conflict(
                "HL, GL and CEID must be set together or not at all",
            ));
        }

        Ok(Self {
            discord,
            initialize: parse_bool(lookup("INITIALIZE_MODE_KEYWORD"), false),
            keyword: if keyword_mode { keyword } else { None },
            rss_url,
            when,
            after_date,
            before_date,
            hl: hl.unwrap_or_else(|| "ko".to_string()),
            gl: gl.unwrap_or_else(|| "KR".to_string()),
            ceid: ceid.unwrap_or_else(|| "KR:ko".to_string()),
            advanced_filter: lookup("ADVANCED_FILTER_KEYWORD").unwrap_or_default(),
            date_filter: lookup("DATE_FILTER_KEYWORD").unwrap_or_default(),
            origin_links: parse_bool(lookup("ORIGIN_LINK_KEYWORD"), true),
            db_path: lookup("DB_PATH_KEYWORD")
                .unwrap_or_else(|| "google_news_keyword.db".to_string()),
            offset_hours: offset_hours(lookup)?,
        })
    }

    /// The `q=` value including any date tokens
    pub fn search_query(&self) -> Option<String> {
        let keyword = self.keyword.as_deref()?;
        let mut query = keyword.to_string();
        if let Some(when) = &self.when {
            query.push_str(&format!(" when:{when}"));
        } else {
            if let Some(after) = &self.after_date {
                query.push_str(&format!(" after:{after}"));
            }
            if let Some(before) = &self.before_date {
                query.push_str(&format!(" before:{before}"));
            }
        }
        Some(query)
    }
}

impl TopicConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let discord = discord_target(lookup, "DISCORD_WEBHOOK_TOPIC", "TOPIC")?;

        let topic_mode = parse_bool(lookup("TOPIC_MODE"), false);
        let topic_keyword = non_empty(lookup("TOPIC_KEYWORD"));
        let rss_url = non_empty(lookup("RSS_URL_TOPIC"));

        if topic_mode {
            let keyword = topic_keyword
                .as_deref()
                .ok_or(ConfigError::Missing("TOPIC_KEYWORD"))?;
            if newscord_gnews::topics::topic_by_keyword(keyword).is_none() {
                return Err(ConfigError::Invalid {
                    field: "TOPIC_KEYWORD",
                    message: format!("unknown topic keyword '{keyword}'"),
                });
            }
        } else if rss_url.is_none() {
            return Err(ConfigError::Missing("RSS_URL_TOPIC"));
        }

        Ok(Self {
            discord,
            initialize: parse_bool(lookup("INITIALIZE_MODE_TOPIC"), false),
            topic_keyword: if topic_mode { topic_keyword } else { None },
            topic_params: lookup("TOPIC_PARAMS")
                .unwrap_or_else(|| "hl=ko&gl=KR&ceid=KR%3Ako".to_string()),
            rss_url,
            advanced_filter: lookup("ADVANCED_FILTER_TOPIC").unwrap_or_default(),
            date_filter: lookup("DATE_FILTER_TOPIC").unwrap_or_default(),
            origin_links: parse_bool(lookup("ORIGIN_LINK_TOPIC"), true),
            db_path: lookup("DB_PATH_TOPIC").unwrap_or_else(|| "google_news_topic.db".to_string()),
            offset_hours: offset_hours(lookup)?,
        })
    }
}

impl TopConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let discord = discord_target(lookup, "DISCORD_WEBHOOK_TOP", "TOP")?;

        let top_mode = parse_bool(lookup("TOP_MODE"), false);
        let country = non_empty(lookup("TOP_COUNTRY"));
        let rss_url = non_empty(lookup("RSS_URL_TOP"));

        if top_mode {
            let code = country
                .as_deref()
                .ok_or(ConfigError::Missing("TOP_COUNTRY"))?;
            if newscord_gnews::locale::country_config(code).is_none() {
                return Err(ConfigError::Invalid {
                    field: "TOP_COUNTRY",
                    message: format!("unsupported country code '{code}'"),
                });
            }
        } else if rss_url.is_none() {
            return Err(ConfigError::Missing("RSS_URL_TOP"));
        }

        Ok(Self {
            discord,
            initialize: parse_bool(lookup("INITIALIZE_MODE_TOP"), false),
            country: if top_mode { country } else { None },
            rss_url,
            advanced_filter: lookup("ADVANCED_FILTER_TOP").unwrap_or_default(),
            date_filter: lookup("DATE_FILTER_TOP").unwrap_or_default(),
            origin_links: parse_bool(lookup("ORIGIN_LINK_TOP"), true),
            db_path: lookup("DB_PATH_TOP").unwrap_or_else(|| "google_news_top.db".to_string()),
            offset_hours: offset_hours(lookup)?,
        })
    }
}

impl YoutubeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let webhook_url =
            non_empty(lookup("DISCORD_YOUTUBE_WEBHOOK")).ok_or(ConfigError::Missing(
                "DISCORD_YOUTUBE_WEBHOOK",
            ))?;
        let api_key =
            non_empty(lookup("YOUTUBE_API_KEY")).ok_or(ConfigError::Missing("YOUTUBE_API_KEY"))?;

        let channel_id = non_empty(lookup("YOUTUBE_CHANNEL_ID"));
        let playlist_id = non_empty(lookup("YOUTUBE_PLAYLIST_ID"));
        if channel_id.is_none() && playlist_id.is_none() {
            return Err(ConfigError::Missing("YOUTUBE_CHANNEL_ID"));
        }

        let lookback_hours = match lookup("YOUTUBE_LOOKBACK_HOURS") {
            Some(value) => value.parse::<i64>().map_err(|_| ConfigError::Invalid {
                field: "YOUTUBE_LOOKBACK_HOURS",
                message: format!("expected an integer, got '{value}'"),
            })?,
            None => 1,
        };

        Ok(Self {
            discord: DiscordTarget {
                webhook_url,
                username: non_empty(lookup("DISCORD_YOUTUBE_USERNAME")),
                avatar_url: non_empty(lookup("DISCORD_YOUTUBE_AVATAR")),
            },
            api_key,
            channel_id,
            playlist_id,
            first_run: parse_bool(lookup("IS_FIRST_RUN"), false),
            lookback_hours,
            db_path: lookup("DB_PATH_YOUTUBE").unwrap_or_else(|| "youtube.db".to_string()),
        })
    }
}

/// Errors raised while validating the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },

    #[error("Conflicting settings: {0}")]
    Conflict(&'static str),
}

fn discord_target(
    lookup: &dyn Fn(&str) -> Option<String>,
    webhook_var: &'static str,
    suffix: &str,
) -> Result<DiscordTarget, ConfigError> {
    let webhook_url = non_empty(lookup(webhook_var)).ok_or(ConfigError::Missing(webhook_var))?;
    Ok(DiscordTarget {
        webhook_url,
        username: non_empty(lookup(&format!("DISCORD_USERNAME_{suffix}"))),
        avatar_url: non_empty(lookup(&format!("DISCORD_AVATAR_{suffix}"))),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value {
        Some(v) => matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        None => default,
    }
}

fn offset_hours(lookup: &dyn Fn(&str) -> Option<String>) -> Result<i32, ConfigError> {
    match lookup("DISPLAY_UTC_OFFSET_HOURS") {
        Some(value) => {
            let hours = value.parse::<i32>().map_err(|_| ConfigError::Invalid {
                field: "DISPLAY_UTC_OFFSET_HOURS",
                message: format!("expected an integer, got '{value}'"),
            })?;
            // Real UTC offsets run from -12:00 to +14:00
            if !(-12..=14).contains(&hours) {
                return Err(ConfigError::Invalid {
                    field: "DISPLAY_UTC_OFFSET_HOURS",
                    message: format!("expected a value between -12 and 14, got {hours}"),
                });
            }
            Ok(hours)
        }
        // The original rendered everything in Asia/Seoul
        None => Ok(9),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_keyword_config_keyword_mode() {
        let lookup = lookup_from(&[
            ("DISCORD_WEBHOOK_KEYWORD", "https://discord.com/api/webhooks/1/x"),
            ("KEYWORD_MODE", "true"),
            ("KEYWORD", "인공지능"),
            ("WHEN", "1d"),
        ]);
        let config = KeywordConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.keyword.as_deref(), Some("인공지능"));
        assert_eq!(config.search_query().as_deref(), Some("인공지능 when:1d"));
        assert_eq!(config.hl, "ko");
        assert!(config.origin_links);
        assert_eq!(config.offset_hours, 9);
    }

    #[test]
    fn test_keyword_config_requires_webhook() {
        let lookup = lookup_from(&[("KEYWORD_MODE", "true"), ("KEYWORD", "ai")]);
        assert!(matches!(
            KeywordConfig::from_lookup(&lookup),
            Err(ConfigError::Missing("DISCORD_WEBHOOK_KEYWORD"))
        ));
    }

    #[test]
    fn test_keyword_config_rejects_when_with_dates() {
        let lookup = lookup_from(&[
            ("DISCORD_WEBHOOK_KEYWORD", "https://discord.com/api/webhooks/1/x"),
            ("KEYWORD_MODE", "true"),
            ("KEYWORD", "ai"),
            ("WHEN", "1d"),
            ("AFTER_DATE", "2025-01-01"),
        ]);
        assert!(matches!(
            KeywordConfig::from_lookup(&lookup),
            Err(ConfigError::Conflict(_))
        ));
    }

    #[test]
    fn test_keyword_config_rejects_bad_date() {
        let lookup = lookup_from(&[
            ("DISCORD_WEBHOOK_KEYWORD", "https://discord.com/api/webhooks/1/x"),
            ("KEYWORD_MODE", "true"),
            ("KEYWORD", "ai"),
            ("AFTER_DATE", "01/02/2025"),
        ]);
        assert!(matches!(
            KeywordConfig::from_lookup(&lookup),
            Err(ConfigError::Invalid { field: "AFTER_DATE", .. })
        ));
    }

    #[test]
    fn test_keyword_config_locale_all_or_none() {
        let lookup = lookup_from(&[
            ("DISCORD_WEBHOOK_KEYWORD", "https://discord.com/api/webhooks/1/x"),
            ("KEYWORD_MODE", "true"),
            ("KEYWORD", "ai"),
            ("HL", "en-US"),
        ]);
        assert!(matches!(
            KeywordConfig::from_lookup(&lookup),
            Err(ConfigError::Conflict(_))
        ));

        let lookup = lookup_from(&[
            ("DISCORD_WEBHOOK_KEYWORD", "https://discord.com/api/webhooks/1/x"),
            ("KEYWORD_MODE", "true"),
            ("KEYWORD", "ai"),
            ("HL", "en-US"),
            ("GL", "US"),
            ("CEID", "US:en"),
        ]);
        let config = KeywordConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.gl, "US");
    }

    #[test]
    fn test_keyword_search_query_date_tokens() {
        let lookup = lookup_from(&[
            ("DISCORD_WEBHOOK_KEYWORD", "https://discord.com/api/webhooks/1/x"),
            ("KEYWORD_MODE", "true"),
            ("KEYWORD", "ai"),
            ("AFTER_DATE", "2025-01-01"),
            ("BEFORE_DATE", "2025-02-01"),
        ]);
        let config = KeywordConfig::from_lookup(&lookup).unwrap();
        assert_eq!(
            config.search_query().as_deref(),
            Some("ai after:2025-01-01 before:2025-02-01")
        );
    }

    #[test]
    fn test_offset_hours_range_checked() {
        let lookup = lookup_from(&[
            ("DISCORD_WEBHOOK_KEYWORD", "https://discord.com/api/webhooks/1/x"),
            ("KEYWORD_MODE", "true"),
            ("KEYWORD", "ai"),
            ("DISPLAY_UTC_OFFSET_HOURS", "9000000"),
        ]);
        assert!(matches!(
            KeywordConfig::from_lookup(&lookup),
            Err(ConfigError::Invalid { field: "DISPLAY_UTC_OFFSET_HOURS", .. })
        ));

        let lookup = lookup_from(&[
            ("DISCORD_WEBHOOK_KEYWORD", "https://discord.com/api/webhooks/1/x"),
            ("KEYWORD_MODE", "true"),
            ("KEYWORD", "ai"),
            ("DISPLAY_UTC_OFFSET_HOURS", "-5"),
        ]);
        assert_eq!(KeywordConfig::from_lookup(&lookup).unwrap().offset_hours, -5);
    }

    #[test]
    fn test_topic_config_validates_keyword() {
        let lookup = lookup_from(&[
            ("DISCORD_WEBHOOK_TOPIC", "https://discord.com/api/webhooks/1/x"),
            ("TOPIC_MODE", "true"),
            ("TOPIC_KEYWORD", "not-a-topic"),
        ]);
        assert!(matches!(
            TopicConfig::from_lookup(&lookup),
            Err(ConfigError::Invalid { field: "TOPIC_KEYWORD", .. })
        ));

        let lookup = lookup_from(&[
            ("DISCORD_WEBHOOK_TOPIC", "https://discord.com/api/webhooks/1/x"),
            ("TOPIC_MODE", "true"),
            ("TOPIC_KEYWORD", "headlines"),
        ]);
        let config = TopicConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.topic_keyword.as_deref(), Some("headlines"));
        assert_eq!(config.topic_params, "hl=ko&gl=KR&ceid=KR%3Ako");
    }

    #[test]
    fn test_top_config_validates_country() {
        let lookup = lookup_from(&[
            ("DISCORD_WEBHOOK_TOP", "https://discord.com/api/webhooks/1/x"),
            ("TOP_MODE", "true"),
            ("TOP_COUNTRY", "ZZ"),
        ]);
        assert!(matches!(
            TopConfig::from_lookup(&lookup),
            Err(ConfigError::Invalid { field: "TOP_COUNTRY", .. })
        ));
    }

    #[test]
    fn test_top_config_requires_url_without_top_mode() {
        let lookup = lookup_from(&[(
            "DISCORD_WEBHOOK_TOP",
            "https://discord.com/api/webhooks/1/x",
        )]);
        assert!(matches!(
            TopConfig::from_lookup(&lookup),
            Err(ConfigError::Missing("RSS_URL_TOP"))
        ));
    }

    #[test]
    fn test_youtube_config() {
        let lookup = lookup_from(&[
            ("DISCORD_YOUTUBE_WEBHOOK", "https://discord.com/api/webhooks/1/x"),
            ("YOUTUBE_API_KEY", "key"),
            ("YOUTUBE_CHANNEL_ID", "UCabc"),
            ("IS_FIRST_RUN", "1"),
        ]);
        let config = YoutubeConfig::from_lookup(&lookup).unwrap();
        assert!(config.first_run);
        assert_eq!(config.lookback_hours, 1);

        let lookup = lookup_from(&[
            ("DISCORD_YOUTUBE_WEBHOOK", "https://discord.com/api/webhooks/1/x"),
            ("YOUTUBE_API_KEY", "key"),
        ]);
        assert!(matches!(
            YoutubeConfig::from_lookup(&lookup),
            Err(ConfigError::Missing("YOUTUBE_CHANNEL_ID"))
        ));
    }
}
