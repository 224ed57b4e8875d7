//! Title/date filters applied before posting
//!
//! Both filters are configured with a small query string from the
//! environment. An empty string means the filter passes everything.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;
use tracing::warn;

/// Include/exclude term filter over title and description text.
///
/// Terms are whitespace separated. A `-` prefix excludes, anything else
/// includes. Quotes group multi-word phrases: `+"climate change" -opinion`.
/// Matching is case-insensitive; all include terms must match and no
/// exclude term may match.
#[derive(Debug, Clone, Default)]
pub struct AdvancedFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl AdvancedFilter {
    pub fn parse(query: &str) -> Self {
        let mut include = Vec::new();
        let mut exclude = Vec::new();

        let term_re = match Regex::new(r#"([+-]?)(?:"([^"]*)"|(\S+))"#) {
            Ok(re) => re,
            Err(_) => return Self::default(),
        };

        for caps in term_re.captures_iter(query) {
            let term = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().to_lowercase())
                .unwrap_or_default();
            if term.is_empty() {
                continue;
            }
            if caps.get(1).map(|m| m.as_str()) == Some("-") {
                exclude.push(term);
            } else {
                include.push(term);
            }
        }

        Self { include, exclude }
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    pub fn matches(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.include.iter().all(|term| haystack.contains(term))
            && !self.exclude.iter().any(|term| haystack.contains(term))
    }
}

/// Publication-date filter.
///
/// Accepts `since:YYYY-MM-DD`, `until:YYYY-MM-DD` and `past:N[hdmy]`
/// tokens. `past:` takes precedence over `since:`/`until:` when both
/// are present. Months and years are approximated as 30 and 365 days.
#[derive(Debug, Clone, Default)]
pub struct DateFilter {
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    past: Option<Duration>,
}

impl DateFilter {
    pub fn parse(query: &str) -> Self {
        let mut filter = Self::default();

        for token in query.split_whitespace() {
            if let Some(value) = token.strip_prefix("since:") {
                filter.since = parse_day(value).map(|d| {
                    d.and_hms_opt(0, 0, 0)
                        .unwrap_or_default()
                        .and_utc()
                });
            } else if let Some(value) = token.strip_prefix("until:") {
                filter.until = parse_day(value).map(|d| {
                    d.and_hms_opt(23, 59, 59)
                        .unwrap_or_default()
                        .and_utc()
                });
            } else if let Some(value) = token.strip_prefix("past:") {
                filter.past = parse_past(value);
            } else {
                warn!("Ignoring unrecognized date filter token: {}", token);
            }
        }

        filter
    }

    pub fn is_empty(&self) -> bool {
        self.since.is_none() && self.until.is_none() && self.past.is_none()
    }

    pub fn matches(&self, published_at: DateTime<Utc>) -> bool {
        self.matches_at(published_at, Utc::now())
    }

    fn matches_at(&self, published_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if let Some(window) = self.past {
            return published_at >= now - window;
        }
        if let Some(since) = self.since {
            if published_at < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if published_at > until {
                return false;
            }
        }
        true
    }
}

fn parse_day(value: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            warn!("Invalid date in filter: {}", value);
            None
        }
    }
}

fn parse_past(value: &str) -> Option<Duration> {
    let mut chars = value.chars();
    let unit = chars.next_back()?;
    let amount: i64 = chars.as_str().parse().ok()?;
    match unit {
        'h' => Some(Duration::hours(amount)),
        'd' => Some(Duration::days(amount)),
        'm' => Some(Duration::days(amount * 30)),
        'y' => Some(Duration::days(amount * 365)),
        _ => {
            warn!("Invalid past: unit in filter: {}", value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advanced_filter_include_exclude() {
        let filter = AdvancedFilter::parse(r#"+ai -opinion"#);
        assert!(filter.matches("New AI model released"));
        assert!(!filter.matches("Opinion: AI is overrated"));
        assert!(!filter.matches("Sports roundup"));
    }

    #[test]
    fn test_advanced_filter_quoted_phrase() {
        let filter = AdvancedFilter::parse(r#"+"climate change" -"op ed""#);
        assert!(filter.matches("Climate change summit opens"));
        assert!(!filter.matches("Climate policy debated"));
        assert!(!filter.matches("Op ed: climate change is here"));
    }

    #[test]
    fn test_advanced_filter_bare_terms_include() {
        // Terms without a +/- prefix count as include terms
        let filter = AdvancedFilter::parse("samsung galaxy");
        assert!(filter.matches("Samsung Galaxy launch event"));
        assert!(!filter.matches("Samsung earnings report"));
    }

    #[test]
    fn test_advanced_filter_empty_passes_everything() {
        let filter = AdvancedFilter::parse("");
        assert!(filter.is_empty());
        assert!(filter.matches("anything at all"));
    }

    #[test]
    fn test_date_filter_since_until() {
        let filter = DateFilter::parse("since:2025-01-01 until:2025-01-31");
        let inside = "2025-01-15T12:00:00Z".parse().unwrap();
        let before = "2024-12-31T12:00:00Z".parse().unwrap();
        let after = "2025-02-01T12:00:00Z".parse().unwrap();
        assert!(filter.matches(inside));
        assert!(!filter.matches(before));
        assert!(!filter.matches(after));
    }

    #[test]
    fn test_date_filter_until_is_inclusive() {
        let filter = DateFilter::parse("until:2025-01-31");
        let end_of_day = "2025-01-31T20:00:00Z".parse().unwrap();
        assert!(filter.matches(end_of_day));
    }

    #[test]
    fn test_date_filter_past_takes_precedence() {
        let filter = DateFilter::parse("past:1d since:2000-01-01");
        let now = "2025-01-15T12:00:00Z".parse().unwrap();
        let recent = "2025-01-15T00:00:00Z".parse().unwrap();
        let old = "2025-01-10T00:00:00Z".parse().unwrap();
        assert!(filter.matches_at(recent, now));
        // Old item passes since: but past: wins
        assert!(!filter.matches_at(old, now));
    }

    #[test]
    fn test_date_filter_past_units() {
        let now = "2025-06-15T00:00:00Z".parse().unwrap();
        let months = DateFilter::parse("past:2m");
        let two_months_ago = "2025-04-20T00:00:00Z".parse().unwrap();
        let three_months_ago = "2025-03-10T00:00:00Z".parse().unwrap();
        assert!(months.matches_at(two_months_ago, now));
        assert!(!months.matches_at(three_months_ago, now));
    }

    #[test]
    fn test_date_filter_bad_tokens_ignored() {
        let filter = DateFilter::parse("since:notadate past:5x");
        assert!(filter.is_empty());
    }

    #[test]
    fn test_date_filter_multibyte_unit_ignored() {
        // A localized unit typo must be skipped, not split mid-character
        let filter = DateFilter::parse("past:1시간");
        assert!(filter.is_empty());
        assert!(filter.matches("2020-01-01T00:00:00Z".parse().unwrap()));
    }
}
