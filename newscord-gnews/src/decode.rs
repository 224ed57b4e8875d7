//! Offline decoding of Google News article links
//!
//! Feed links point at `news.google.com/rss/articles/<blob>` where the blob
//! is base64url-encoded protobuf carrying the original article URL. Newer
//! blobs hold the URL in a length-prefixed field behind an `08 13 22` marker;
//! older blobs embed a bare URL (or a YouTube video ID) somewhere in the raw
//! bytes. Blobs whose payload starts with `AU_yqL` carry an opaque token and
//! only resolve through the batchexecute RPC.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use percent_encoding::percent_decode_str;
use url::Url;

/// Outcome of decoding a single feed link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Blob decoded offline to the original article URL
    Url(String),
    /// Payload is an opaque token; the carried article ID must go through
    /// the batchexecute RPC
    NeedsRpc(String),
    /// Not a Google News article link, use it as-is
    Passthrough,
    /// Unrecognized blob, caller should fall back to following redirects
    Failed,
}

/// Decode a Google News redirect link to the original article URL.
///
/// Purely offline: no network calls. `Decoded::NeedsRpc` and
/// `Decoded::Failed` tell the caller which fallback to try.
pub fn decode_article_url(source_url: &str) -> Decoded {
    let Some(id) = article_id(source_url) else {
        return Decoded::Passthrough;
    };
    let Some(raw) = decode_blob_base64(&id) else {
        return Decoded::Failed;
    };

    if let Some(outcome) = decode_new_format(&raw, &id) {
        return outcome;
    }

    // Older blobs: a YouTube video ID marker, or a bare URL in the bytes
    if let Some(video_id) = extract_youtube_id(&raw) {
        return Decoded::Url(format!("https://www.youtube.com/watch?v={video_id}"));
    }
    if let Some(url) = extract_embedded_url(&raw) {
        return Decoded::Url(clean_url(&url));
    }

    Decoded::Failed
}

/// Extract the base64 blob from an article link path.
///
/// Returns None for anything that is not a `news.google.com` article or
/// read link.
pub fn article_id(source_url: &str) -> Option<String> {
    let url = Url::parse(source_url).ok()?;
    if url.host_str() != Some("news.google.com") {
        return None;
    }
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [.., kind, id] if *kind == "articles" || *kind == "read" => Some((*id).to_string()),
        _ => None,
    }
}

/// Forgiving base64url decode of the article blob
fn decode_blob_base64(id: &str) -> Option<Vec<u8>> {
    URL_SAFE_NO_PAD.decode(id.trim_end_matches('=')).ok()
}

/// Try the newer blob layout: `08 13 22` marker, optional `d2 01 00`
/// trailer, then a length-prefixed payload (two prefix bytes when the
/// first is >= 0x80).
fn decode_new_format(raw: &[u8], id: &str) -> Option<Decoded> {
    let body = raw.strip_prefix(&[0x08, 0x13, 0x22][..])?;
    let body = body.strip_suffix(&[0xd2, 0x01, 0x00][..]).unwrap_or(body);

    let len = *body.first()? as usize;
    let payload = if len >= 0x80 {
        body.get(2..len + 1)?
    } else {
        body.get(1..len + 1)?
    };

    if payload.starts_with(b"AU_yqL") {
        return Some(Decoded::NeedsRpc(id.to_string()));
    }

    extract_embedded_url(payload).map(|url| Decoded::Url(clean_url(&url)))
}

/// Find the `08 20 22 0b <11-char id> 98 01 01` YouTube marker in an old
/// format blob
fn extract_youtube_id(raw: &[u8]) -> Option<String> {
    let re = regex::bytes::Regex::new(r#"(?s-u)\x08 "\x0b([\w-]{11})\x98\x01\x01"#).ok()?;
    let caps = re.captures(raw)?;
    Some(String::from_utf8_lossy(&caps[1]).into_owned())
}

/// Scan printable-ASCII runs of the blob for an embedded http(s) URL
fn extract_embedded_url(raw: &[u8]) -> Option<String> {
    let re = regex::Regex::new(r"https?://\S+").ok()?;
    for run in raw.split(|b| !(0x20..=0x7e).contains(b)) {
        let Ok(text) = std::str::from_utf8(run) else {
            continue;
        };
        if let Some(m) = re.find(text) {
            return Some(m.as_str().to_string());
        }
    }
    None
}

/// Normalize a decoded article URL.
///
/// Decoded payloads and RPC responses come back with JSON-style `\uXXXX`
/// escapes, stray backslashes and percent-encoding baked in. MSN links
/// additionally arrive as plain http with a pile of tracking params.
pub fn clean_url(url: &str) -> String {
    let unescaped = unescape_unicode(url).replace('\\', "");
    let decoded = percent_decode_str(&unescaped)
        .decode_utf8_lossy()
        .into_owned();

    let Ok(mut parsed) = Url::parse(&decoded) else {
        return decoded;
    };

    if parsed.host_str().is_some_and(|h| h.ends_with("msn.com")) {
        let _ = parsed.set_scheme("https");
        let kept: Vec<(String, String)> = parsed
            .query_pairs()
            .filter(|(k, _)| k == "id" || k == "article")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        parsed.set_query(None);
        if !kept.is_empty() {
            let mut pairs = parsed.query_pairs_mut();
            for (k, v) in &kept {
                pairs.append_pair(k, v);
            }
        }
    }

    // Url re-encodes spaces and non-ASCII on output
    parsed.to_string()
}

/// Replace JSON-style `\uXXXX` escape sequences with the characters they
/// name
fn unescape_unicode(text: &str) -> String {
    let Ok(re) = regex::Regex::new(r"\\u([0-9a-fA-F]{4})") else {
        return text.to_string();
    };
    re.replace_all(text, |caps: &regex::Captures| {
        u32::from_str_radix(&caps[1], 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_new_format_blob() {
        // 08 13 22 | len 0x20 | "https://example.com/some-article" | d2 01 00
        let link = "https://news.google.com/rss/articles/CBMiIGh0dHBzOi8vZXhhbXBsZS5jb20vc29tZS1hcnRpY2xl0gEA";
        assert_eq!(
            decode_article_url(link),
            Decoded::Url("https://example.com/some-article".to_string())
        );
    }

    #[test]
    fn test_decode_long_payload_uses_two_length_bytes() {
        let url = format!("https://example.com/{}", "a".repeat(160));
        let mut blob = vec![0x08, 0x13, 0x22];
        let len = url.len() + 1;
        blob.push((len & 0x7f) as u8 | 0x80);
        blob.push((len >> 7) as u8);
        blob.extend_from_slice(url.as_bytes());
        blob.extend_from_slice(&[0xd2, 0x01, 0x00]);
        let link = format!(
            "https://news.google.com/rss/articles/{}",
            URL_SAFE_NO_PAD.encode(&blob)
        );
        assert_eq!(decode_article_url(&link), Decoded::Url(url));
    }

    #[test]
    fn test_decode_old_format_youtube_blob() {
        // 08 20 22 0b "dQw4w9WgXcQ" 98 01 01
        let link = "https://news.google.com/rss/articles/CCAiC2RRdzR3OVdnWGNRmAEB";
        assert_eq!(
            decode_article_url(link),
            Decoded::Url("https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_decode_opaque_payload_needs_rpc() {
        let mut blob = vec![0x08, 0x13, 0x22];
        let token = "AU_yqLMDyyN8Y-X5fi-AaE5I1r1Qd2wLQwMPrpTXrY8";
        blob.push(token.len() as u8);
        blob.extend_from_slice(token.as_bytes());
        blob.extend_from_slice(&[0xd2, 0x01, 0x00]);
        let id = URL_SAFE_NO_PAD.encode(&blob);
        let link = format!("https://news.google.com/rss/articles/{id}");
        assert_eq!(decode_article_url(&link), Decoded::NeedsRpc(id));
    }

    #[test]
    fn test_decode_non_google_link_passes_through() {
        assert_eq!(
            decode_article_url("https://example.com/news/story"),
            Decoded::Passthrough
        );
        // Google host but not an article path
        assert_eq!(
            decode_article_url("https://news.google.com/rss?hl=en-US"),
            Decoded::Passthrough
        );
    }

    #[test]
    fn test_decode_garbage_blob_fails() {
        assert_eq!(
            decode_article_url("https://news.google.com/rss/articles/!!!not-base64!!!"),
            Decoded::Failed
        );
    }

    #[test]
    fn test_article_id_from_read_path() {
        assert_eq!(
            article_id("https://news.google.com/read/CBMiAA?hl=en-US&gl=US"),
            Some("CBMiAA".to_string())
        );
        assert_eq!(article_id("https://news.google.com/topics/XYZ"), None);
    }

    #[test]
    fn test_clean_url_unescapes_and_strips_backslashes() {
        assert_eq!(
            clean_url(r"https:\/\/example.com\/path/sub"),
            "https://example.com/path/sub"
        );
    }

    #[test]
    fn test_clean_url_msn_special_case() {
        let cleaned = clean_url(
            "http://www.msn.com/en-us/news/other/title/ar-AA1vjBE3?ocid=BingNewsSerp&id=X1",
        );
        assert!(cleaned.starts_with("https://www.msn.com/"));
        assert!(cleaned.contains("id=X1"));
        assert!(!cleaned.contains("ocid"));
    }

    #[test]
    fn test_clean_url_encodes_spaces() {
        assert_eq!(
            clean_url("https://example.com/some path?q=a b"),
            "https://example.com/some%20path?q=a%20b"
        );
    }

    #[test]
    fn test_extract_embedded_url_skips_binary_noise() {
        let mut raw = vec![0x08, 0x13, 0x01, 0xff];
        raw.extend_from_slice(b"junk https://example.org/a ");
        raw.push(0x00);
        assert_eq!(
            extract_embedded_url(&raw),
            Some("https://example.org/a".to_string())
        );
    }
}
