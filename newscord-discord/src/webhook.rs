//! Discord webhook client

use serde::Serialize;
use tracing::{info, warn};

/// Hard Discord limit on message content
pub const MAX_CONTENT_LEN: usize = 2000;

/// A webhook execute payload
#[derive(Debug, Clone, Serialize)]
pub struct WebhookMessage {
    /// Message content, at most [`MAX_CONTENT_LEN`] chars
    pub content: String,
    /// Override the webhook's display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Override the webhook's avatar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl WebhookMessage {
    /// Build a payload, truncating the content to the Discord limit and
    /// dropping blank username/avatar overrides
    pub fn new(content: String, username: Option<String>, avatar_url: Option<String>) -> Self {
        Self {
            content: truncate_content(&content, MAX_CONTENT_LEN),
            username: username.filter(|s| !s.trim().is_empty()),
            avatar_url: avatar_url.filter(|s| !s.trim().is_empty()),
        }
    }
}

/// Webhook execute client
pub struct WebhookClient {
    client: reqwest::Client,
}

impl WebhookClient {
    /// Create a new client
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Execute a webhook.
    ///
    /// A 429 is retried once after the server's Retry-After delay.
    pub async fn execute(&self, url: &str, message: &WebhookMessage) -> Result<(), WebhookError> {
        match self.post_once(url, message).await {
            Err(WebhookError::RateLimited { retry_after }) => {
                warn!("Webhook rate limited, retrying after {}s", retry_after);
                tokio::time::sleep(std::time::Duration::from_secs_f64(retry_after)).await;
                self.post_once(url, message).await
            }
            result => result,
        }
    }

    async fn post_once(&self, url: &str, message: &WebhookMessage) -> Result<(), WebhookError> {
        let response = self
            .client
            .post(url)
            .json(message)
            .send()
            .await
            .map_err(|e| WebhookError::HttpError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NO_CONTENT || status.is_success() {
            info!("Posted webhook message ({} chars)", message.content.len());
            return Ok(());
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(1.0);
            return Err(WebhookError::RateLimited { retry_after });
        }

        let body = response.text().await.unwrap_or_default();
        Err(WebhookError::ApiError {
            status: status.as_u16(),
            message: body,
        })
    }
}

impl Default for WebhookClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when executing a webhook
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Discord rejected the request
    #[error("Webhook error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Rate limited, retry after the given delay
    #[error("Rate limited, retry after {retry_after}s")]
    RateLimited {
        /// Seconds to wait, from the Retry-After header
        retry_after: f64,
    },
}

/// Truncate at a char boundary, marking the cut with an ellipsis
fn truncate_content(content: &str, max_len: usize) -> String {
    if content.chars().count() <= max_len {
        return content.to_string();
    }
    let mut out: String = content.chars().take(max_len.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_drops_blank_overrides() {
        let msg = WebhookMessage::new(
            "hello".to_string(),
            Some("  ".to_string()),
            Some("https://example.com/a.png".to_string()),
        );
        assert!(msg.username.is_none());
        assert_eq!(msg.avatar_url.as_deref(), Some("https://example.com/a.png"));

        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("username").is_none());
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn test_truncate_content_respects_char_boundaries() {
        let long = "가".repeat(2500);
        let msg = WebhookMessage::new(long, None, None);
        assert_eq!(msg.content.chars().count(), MAX_CONTENT_LEN);
        assert!(msg.content.ends_with('…'));

        let short = WebhookMessage::new("short".to_string(), None, None);
        assert_eq!(short.content, "short");
    }
}
