//! Feed URL construction and RSS item parsing
//!
//! Google News item descriptions are a small HTML fragment: an `<ol>` of
//! related coverage where each `<li>` holds an article anchor and the
//! outlet name in a `<font color="#6f6f6f">` tag, plus an optional "View
//! Full Coverage" entry. Links inside stay unresolved here, resolution is
//! async and happens in the pipeline.

use chrono::{DateTime, Utc};

use crate::locale::CountryConfig;

/// A parsed feed entry with links still pointing at news.google.com
#[derive(Debug, Clone)]
pub struct FeedItem {
    /// Feed GUID, the deduplication key
    pub guid: String,
    /// Item title as published
    pub title: String,
    /// Google redirect link
    pub link: String,
    /// Raw RFC 2822 pubDate string
    pub pub_date_raw: String,
    /// Parsed publication date
    pub published_at: DateTime<Utc>,
    /// Raw description HTML, kept for filtering
    pub description: String,
    /// Related coverage parsed from the description
    pub related: Vec<RawRelated>,
    /// "View Full Coverage" link, when present
    pub full_coverage: Option<String>,
}

/// A related-coverage entry before link resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRelated {
    /// Article title
    pub title: String,
    /// Google redirect link
    pub link: String,
    /// Publishing outlet name
    pub press: String,
}

/// Build a keyword-search feed URL
pub fn search_feed_url(query: &str, hl: &str, gl: &str, ceid: &str) -> String {
    format!(
        "https://news.google.com/rss/search?q={}&hl={}&gl={}&ceid={}",
        urlencoding::encode(query),
        hl,
        gl,
        ceid
    )
}

/// Build a top-stories feed URL for a country
pub fn top_feed_url(country: &CountryConfig) -> String {
    format!(
        "https://news.google.com/rss?hl={}&gl={}&ceid={}",
        country.hl,
        country.code,
        urlencoding::encode(country.ceid)
    )
}

/// Build a topic feed URL from a topic ID and locale params
/// (e.g. `hl=ko&gl=KR&ceid=KR:ko`)
pub fn topic_feed_url(topic_id: &str, params: &str) -> String {
    format!(
        "https://news.google.com/rss/topics/{}?{}",
        topic_id,
        params.trim_start_matches('?')
    )
}

/// Recover the search term from a search feed's channel title.
///
/// Search feeds title themselves `"<query>" - Google News`; the `when:`
/// recency token is not part of the term.
pub fn search_term_from_title(channel_title: &str) -> Option<String> {
    let (_, rest) = channel_title.split_once('"')?;
    let term = rest.split('"').next().unwrap_or(rest);
    let term = term.split("when:").next().unwrap_or(term).trim();
    if term.is_empty() {
        None
    } else {
        Some(term.to_string())
    }
}

/// Convert a parsed RSS channel into feed items, oldest first
pub fn parse_channel(channel: &rss::Channel) -> Vec<FeedItem> {
    let mut items: Vec<FeedItem> = channel
        .items()
        .iter()
        .filter_map(|item| {
            let title = item.title()?.to_string();
            let link = item.link()?.to_string();
            let guid = item
                .guid()
                .map(|g| g.value().to_string())
                .unwrap_or_else(|| link.clone());

            let pub_date_raw = item.pub_date().unwrap_or_default().to_string();
            let published_at = item
                .pub_date()
                .and_then(|d| {
                    DateTime::parse_from_rfc2822(d)
                        .ok()
                        .map(|dt| dt.with_timezone(&Utc))
                        .or_else(|| {
                            DateTime::parse_from_rfc3339(d)
                                .ok()
                                .map(|dt| dt.with_timezone(&Utc))
                        })
                })
                .unwrap_or_else(Utc::now);

            let description = item.description().unwrap_or_default().to_string();
            let (related, full_coverage) = parse_description(&description);

            Some(FeedItem {
                guid,
                title,
                link,
                pub_date_raw,
                published_at,
                description,
                related,
                full_coverage,
            })
        })
        .collect();

    // Feeds list newest first; posting order wants oldest first
    items.sort_by_key(|item| item.published_at);
    items
}

/// Parse the related-coverage list out of an item description
pub fn parse_description(html: &str) -> (Vec<RawRelated>, Option<String>) {
    let mut related = Vec::new();
    let mut full_coverage = None;

    let Ok(li_re) = regex::Regex::new(r"(?s)<li[^>]*>(.*?)</li>") else {
        return (related, full_coverage);
    };
    let Ok(anchor_re) = regex::Regex::new(r#"(?s)<a[^>]*href="([^"]+)"[^>]*>(.*?)</a>"#) else {
        return (related, full_coverage);
    };
    let Ok(press_re) = regex::Regex::new(r##"(?s)<font[^>]*color="#6f6f6f"[^>]*>(.*?)</font>"##)
    else {
        return (related, full_coverage);
    };

    for li in li_re.captures_iter(html) {
        let body = &li[1];
        let Some(anchor) = anchor_re.captures(body) else {
            continue;
        };
        let link = anchor[1].to_string();
        let title = strip_html(&anchor[2]);

        if title.contains("전체 콘텐츠 보기") || title.contains("View Full Coverage") {
            full_coverage = Some(link);
            continue;
        }

        let press = press_re
            .captures(body)
            .map(|c| strip_html(&c[1]))
            .unwrap_or_default();

        related.push(RawRelated { title, link, press });
    }

    (related, full_coverage)
}

/// Drop tags and unescape the entities Google News feeds actually emit
pub fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale;

    const DESCRIPTION: &str = concat!(
        r##"<ol><li><a href="https://news.google.com/rss/articles/AAA" target="_blank">First story</a>&nbsp;&nbsp;<font color="#6f6f6f">Alpha Times</font></li>"##,
        r##"<li><a href="https://news.google.com/rss/articles/BBB" target="_blank">Second &amp; third</a>&nbsp;&nbsp;<font color="#6f6f6f">Beta Post</font></li>"##,
        r##"<li><a href="https://news.google.com/stories/CCC" target="_blank"><strong>View Full Coverage on Google News</strong></a></li></ol>"##,
    );

    #[test]
    fn test_parse_description_related_and_full_coverage() {
        let (related, full_coverage) = parse_description(DESCRIPTION);
        assert_eq!(related.len(), 2);
        assert_eq!(related[0].title, "First story");
        assert_eq!(related[0].press, "Alpha Times");
        assert_eq!(related[0].link, "https://news.google.com/rss/articles/AAA");
        assert_eq!(related[1].title, "Second & third");
        assert_eq!(
            full_coverage,
            Some("https://news.google.com/stories/CCC".to_string())
        );
    }

    #[test]
    fn test_parse_description_plain_text() {
        let (related, full_coverage) = parse_description("A single-source summary.");
        assert!(related.is_empty());
        assert!(full_coverage.is_none());
    }

    #[test]
    fn test_search_term_from_title() {
        assert_eq!(
            search_term_from_title("\"인공지능\" - Google 뉴스"),
            Some("인공지능".to_string())
        );
        assert_eq!(
            search_term_from_title("\"ai when:1d\" - Google News"),
            Some("ai".to_string())
        );
        assert_eq!(search_term_from_title("Google News"), None);
    }

    #[test]
    fn test_search_feed_url_encodes_query() {
        let url = search_feed_url("\"climate change\" +policy", "en-US", "US", "US:en");
        assert!(url.starts_with("https://news.google.com/rss/search?q="));
        assert!(url.contains("%22climate%20change%22%20%2Bpolicy"));
        assert!(url.ends_with("&hl=en-US&gl=US&ceid=US:en"));
    }

    #[test]
    fn test_top_feed_url_from_country() {
        let kr = locale::country_config("KR").unwrap();
        assert_eq!(
            top_feed_url(kr),
            "https://news.google.com/rss?hl=ko&gl=KR&ceid=KR%3Ako"
        );
    }

    #[test]
    fn test_topic_feed_url_strips_leading_question_mark() {
        assert_eq!(
            topic_feed_url("CAAqAAA", "?hl=ko&gl=KR&ceid=KR%3Ako"),
            "https://news.google.com/rss/topics/CAAqAAA?hl=ko&gl=KR&ceid=KR%3Ako"
        );
    }

    #[test]
    fn test_parse_channel_sorts_oldest_first() {
        let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel>
            <title>Google News</title><link>https://news.google.com</link><description>top</description>
            <item><title>Newer</title><link>https://news.google.com/rss/articles/N</link>
                <guid>guid-new</guid><pubDate>Tue, 14 Jan 2025 09:00:00 GMT</pubDate></item>
            <item><title>Older</title><link>https://news.google.com/rss/articles/O</link>
                <guid>guid-old</guid><pubDate>Mon, 13 Jan 2025 09:00:00 GMT</pubDate></item>
        </channel></rss>"#;
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        let items = parse_channel(&channel);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].guid, "guid-old");
        assert_eq!(items[1].guid, "guid-new");
    }
}
