//! Message formatting for the relay webhooks

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};

use newscord_core::{RelatedArticle, Video};

/// Pre-rendered header line for a news message
#[derive(Debug, Clone, Default)]
pub struct NewsHeader(Option<String>);

impl NewsHeader {
    /// No header, just title and link
    pub fn none() -> Self {
        Self(None)
    }

    /// Keyword-search header: `<flag> \`<prefix> - <category> - <gl>\``
    pub fn keyword(flag: &str, prefix: &str, category: &str, gl: &str) -> Self {
        Self(Some(format!("{flag} `{prefix} - {category} - {gl}`")))
    }

    /// Topic header: `` `<prefix> - <category> - <topic> <flag>` ``
    pub fn topic(prefix: &str, category: &str, topic_name: &str, flag: &str) -> Self {
        Self(Some(format!("`{prefix} - {category} - {topic_name} {flag}`")))
    }

    /// Top-stories header: `` `<brand> - <label> - <country> <flag>` ``
    pub fn top(brand: &str, top_label: &str, country: &str, flag: &str) -> Self {
        Self(Some(format!("`{brand} - {top_label} - {country} {flag}`")))
    }

    fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Render a news message: header, bold title, resolved link, the related
/// coverage as a blockquote, and the publication date
pub fn news_content(
    header: &NewsHeader,
    title: &str,
    link: &str,
    related_block: Option<&str>,
    formatted_date: &str,
) -> String {
    let mut message = match header.as_deref() {
        Some(head) => format!("{head}\n**{title}**\n{link}"),
        None => format!("**{title}**\n{link}"),
    };
    match related_block {
        Some(block) if !block.is_empty() => {
            message.push_str(&format!("\n>>> {block}\n\n"));
        }
        _ => message.push_str("\n\n"),
    }
    message.push_str(&format!("📅 {formatted_date}"));
    message
}

/// Render the related-coverage blockquote body
pub fn related_block(
    related: &[RelatedArticle],
    full_coverage: Option<&str>,
    lang: &str,
) -> Option<String> {
    if related.is_empty() && full_coverage.is_none() {
        return None;
    }

    let mut lines: Vec<String> = related
        .iter()
        .map(|article| {
            format!(
                "- [{}](<{}>) | {}",
                replace_brackets(&article.title),
                article.link,
                article.press
            )
        })
        .collect();

    if let Some(link) = full_coverage {
        let label = if lang.starts_with("ko") {
            "Google 뉴스에서 전체 콘텐츠 보기"
        } else {
            "View Full Coverage on Google News"
        };
        lines.push(format!("▶️ [{label}]({link})"));
    }

    Some(lines.join("\n"))
}

/// Render a video message: `` `<channel> - YouTube` ``, bold title, short URL
pub fn video_content(video: &Video) -> String {
    format!(
        "`{} - YouTube`\n**{}**\n{}",
        video.channel_title,
        replace_brackets(&video.title),
        video.short_url()
    )
}

/// Format a publication date in the display offset.
///
/// Korean feeds keep the original's `YYYY년 MM월 DD일` form, everything
/// else gets a plain `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(dt: DateTime<Utc>, offset_hours: i32, lang: &str) -> String {
    let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap_or_else(|| Utc.fix());
    let local = dt.with_timezone(&offset);
    if lang.starts_with("ko") {
        local.format("%Y년 %m월 %d일 %H:%M:%S").to_string()
    } else {
        local.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Swap `[]<>` for fullwidth `［］〈〉` so titles cannot terminate a
/// markdown link, padding the replacements with spaces where they abut
/// text
pub fn replace_brackets(text: &str) -> String {
    let swapped: String = text
        .chars()
        .map(|c| match c {
            '[' => '［',
            ']' => '］',
            '<' => '〈',
            '>' => '〉',
            other => other,
        })
        .collect();

    let padded = pad_before(&swapped, '［');
    let padded = pad_after(&padded, '］');
    let padded = pad_before(&padded, '〈');
    pad_after(&padded, '〉')
}

fn pad_before(text: &str, target: char) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if c == target && prev.is_some_and(|p| !p.is_whitespace()) {
            out.push(' ');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

fn pad_after(text: &str, target: char) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        out.push(c);
        if c == target && chars.get(i + 1).is_some_and(|n| !n.is_whitespace()) {
            out.push(' ');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_brackets() {
        assert_eq!(
            replace_brackets("[단독] 뉴스 제목 <속보>"),
            "［단독］ 뉴스 제목 〈속보〉"
        );
        assert_eq!(replace_brackets("foo[bar]baz"), "foo ［bar］ baz");
        assert_eq!(replace_brackets("no brackets"), "no brackets");
    }

    #[test]
    fn test_news_content_with_related() {
        let header = NewsHeader::topic("Google 뉴스", "헤드라인 뉴스", "대한민국", "🇰🇷");
        let message = news_content(
            &header,
            "제목",
            "https://example.com/a",
            Some("- [b](<https://example.com/b>) | 신문"),
            "2025년 01월 14일 18:00:00",
        );
        assert!(message.starts_with("`Google 뉴스 - 헤드라인 뉴스 - 대한민국 🇰🇷`\n**제목**\n"));
        assert!(message.contains("\n>>> - [b](<https://example.com/b>) | 신문\n\n"));
        assert!(message.ends_with("📅 2025년 01월 14일 18:00:00"));
    }

    #[test]
    fn test_news_content_without_related() {
        let message = news_content(
            &NewsHeader::none(),
            "Title",
            "https://example.com/a",
            None,
            "2025-01-14 09:00:00",
        );
        assert_eq!(
            message,
            "**Title**\nhttps://example.com/a\n\n📅 2025-01-14 09:00:00"
        );
    }

    #[test]
    fn test_related_block() {
        let related = vec![
            RelatedArticle {
                title: "[단독] Other take".to_string(),
                link: "https://example.com/other".to_string(),
                press: "Example Press".to_string(),
            },
        ];
        let block = related_block(&related, Some("https://news.google.com/stories/x"), "ko")
            .expect("block");
        assert!(block.starts_with("- [［단독］ Other take](<https://example.com/other>) | Example Press"));
        assert!(block.contains("▶️ [Google 뉴스에서 전체 콘텐츠 보기](https://news.google.com/stories/x)"));
        assert!(related_block(&[], None, "ko").is_none());
    }

    #[test]
    fn test_video_content() {
        let video = Video {
            id: "dQw4w9WgXcQ".to_string(),
            title: "A <new> video".to_string(),
            channel_title: "Channel".to_string(),
            published_at: Utc::now(),
        };
        assert_eq!(
            video_content(&video),
            "`Channel - YouTube`\n**A 〈new〉 video**\nhttps://youtu.be/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_format_timestamp_offset_and_locale() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 14, 9, 0, 0).unwrap();
        assert_eq!(format_timestamp(dt, 9, "ko"), "2025년 01월 14일 18:00:00");
        assert_eq!(format_timestamp(dt, 0, "en-US"), "2025-01-14 09:00:00");
        assert_eq!(format_timestamp(dt, -5, "en"), "2025-01-14 04:00:00");
    }
}
