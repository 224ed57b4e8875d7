//! HTTP client for Google News feeds and link resolution

use std::time::Duration;

use rand::Rng;
use reqwest::Client;
use tracing::{info, warn};

use crate::decode::{self, Decoded};
use crate::error::GnewsError;

const FEED_FETCH_TRIES: usize = 3;
const FEED_RETRY_DELAY: Duration = Duration::from_secs(5);
const BATCHEXECUTE_URL: &str =
    "https://news.google.com/_/DotsSplashUi/data/batchexecute?rpcids=Fbv4je";

/// Redirect-follow fallback waits, plus up to 5s of jitter per attempt
const REDIRECT_WAITS: [u64; 5] = [5, 10, 30, 45, 60];

/// Google News HTTP client
pub struct GoogleNewsClient {
    client: Client,
    origin_links: bool,
}

impl GoogleNewsClient {
    /// Create a new client.
    ///
    /// With `origin_links` false, `resolve_article_url` returns feed links
    /// untouched and no resolution traffic is generated.
    pub fn new(origin_links: bool) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .user_agent("Mozilla/5.0 (compatible; Newscord/1.0)")
                .build()
                .unwrap_or_else(|_| Client::new()),
            origin_links,
        }
    }

    /// Fetch and parse an RSS feed, retrying transient failures
    pub async fn fetch_feed(&self, url: &str) -> Result<rss::Channel, GnewsError> {
        let mut last_err = GnewsError::RequestFailed("no attempts made".to_string());

        for attempt in 1..=FEED_FETCH_TRIES {
            match self.try_fetch_feed(url).await {
                Ok(channel) => return Ok(channel),
                Err(e) => {
                    warn!(
                        "Feed fetch failed (attempt {}/{}): {}",
                        attempt, FEED_FETCH_TRIES, e
                    );
                    last_err = e;
                    if attempt < FEED_FETCH_TRIES {
                        tokio::time::sleep(FEED_RETRY_DELAY).await;
                    }
                }
            }
        }

        Err(last_err)
    }

    async fn try_fetch_feed(&self, url: &str) -> Result<rss::Channel, GnewsError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GnewsError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GnewsError::ApiError {
                status: response.status().as_u16(),
                message: format!("Google News returned status {}", response.status()),
            });
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| GnewsError::RequestFailed(e.to_string()))?;

        rss::Channel::read_from(&content[..])
            .map_err(|e| GnewsError::ParseError(format!("Failed to parse RSS feed: {}", e)))
    }

    /// Resolve a feed link to the original article URL.
    ///
    /// Best effort: tries the offline blob decode, then the batchexecute
    /// RPC, then following redirects. Never fails, worst case the Google
    /// link comes back cleaned.
    pub async fn resolve_article_url(&self, link: &str) -> String {
        if !self.origin_links {
            return link.to_string();
        }

        match decode::decode_article_url(link) {
            Decoded::Url(url) => {
                info!("Decoded article link offline: {} -> {}", link, url);
                url
            }
            Decoded::Passthrough => link.to_string(),
            Decoded::NeedsRpc(id) => match self.fetch_decoded_batch_execute(&id).await {
                Ok(url) => {
                    let url = decode::clean_url(&url);
                    info!("Decoded article link via RPC: {} -> {}", link, url);
                    url
                }
                Err(e) => {
                    warn!("RPC decode failed for {}: {}", link, e);
                    self.follow_redirects(link).await
                }
            },
            Decoded::Failed => self.follow_redirects(link).await,
        }
    }

    /// Resolve an opaque `AU_yqL` article ID through the DotsSplashUi
    /// batchexecute RPC
    pub async fn fetch_decoded_batch_execute(&self, id: &str) -> Result<String, GnewsError> {
        let req = format!(
            r#"[[["Fbv4je","[\"garturlreq\",[[\"en-US\",\"US\",[\"FINANCE_TOP_INDICES\",\"WEB_TEST_1_0_0\"],null,null,1,1,\"US:en\",null,180,null,null,null,null,null,0,null,null,[1608992183,723341000]],\"en-US\",\"US\",1,[2,3,4,8],1,0,\"655000234\",0,0,null,0],\"{id}\"]",null,"generic"]]]"#
        );

        let response = self
            .client
            .post(BATCHEXECUTE_URL)
            .header(
                "Content-Type",
                "application/x-www-form-urlencoded;charset=utf-8",
            )
            .header("Referer", "https://news.google.com/")
            .form(&[("f.req", req.as_str())])
            .send()
            .await
            .map_err(|e| GnewsError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GnewsError::ApiError {
                status: response.status().as_u16(),
                message: "batchexecute request rejected".to_string(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| GnewsError::RequestFailed(e.to_string()))?;

        extract_garturlres(&text)
            .ok_or_else(|| GnewsError::RpcFailed("garturlres marker not found".to_string()))
    }

    /// Last-resort resolution: request the Google link and take the final
    /// URL after redirects
    pub async fn follow_redirects(&self, link: &str) -> String {
        for (attempt, wait) in REDIRECT_WAITS.iter().enumerate() {
            match self.client.get(link).send().await {
                Ok(response) if response.status().is_success() => {
                    let final_url = response.url().to_string();
                    info!("Redirect follow resolved {} -> {}", link, final_url);
                    return decode::clean_url(&final_url);
                }
                Ok(response) => {
                    warn!(
                        "Redirect follow got status {} (attempt {}/{})",
                        response.status(),
                        attempt + 1,
                        REDIRECT_WAITS.len()
                    );
                }
                Err(e) => {
                    warn!(
                        "Redirect follow failed (attempt {}/{}): {}",
                        attempt + 1,
                        REDIRECT_WAITS.len(),
                        e
                    );
                }
            }

            if attempt + 1 < REDIRECT_WAITS.len() {
                let jitter = rand::rng().random_range(0..=5u64);
                tokio::time::sleep(Duration::from_secs(wait + jitter)).await;
            }
        }

        warn!("All resolution attempts failed, keeping Google link: {}", link);
        decode::clean_url(link)
    }
}

impl Default for GoogleNewsClient {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Pull the decoded URL out of a batchexecute response body.
///
/// The body is anti-XSSI-prefixed JSON with the URL escaped inside a
/// string, so a marker scan is more robust than parsing the envelope.
fn extract_garturlres(text: &str) -> Option<String> {
    let header = r#"[\"garturlres\",\""#;
    let footer = r#"\","#;
    let (_, rest) = text.split_once(header)?;
    let (url, _) = rest.split_once(footer)?;
    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_garturlres() {
        let body = r#")]}'

[["wrb.fr","Fbv4je","[[\"garturlres\",\"https://example.com/decoded-article\",123]]",null,null,null,"generic"]]"#;
        assert_eq!(
            extract_garturlres(body),
            Some("https://example.com/decoded-article".to_string())
        );
    }

    #[test]
    fn test_extract_garturlres_missing_marker() {
        assert_eq!(extract_garturlres(r#")]}' [["er",null]]"#), None);
    }
}
