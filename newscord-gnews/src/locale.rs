//! Locale data for top-stories feeds and message headers

/// Per-country feed parameters and display strings for top-stories mode
#[derive(Debug, Clone)]
pub struct CountryConfig {
    /// ISO 3166-1 alpha-2 country code (the `gl` param)
    pub code: &'static str,
    /// Interface language (the `hl` param)
    pub hl: &'static str,
    /// Country edition (the `ceid` param)
    pub ceid: &'static str,
    /// Localized Google News brand name
    pub brand: &'static str,
    /// Localized "Top stories" label
    pub top_label: &'static str,
    /// Country name in its own language
    pub name_local: &'static str,
    /// Country name in English
    pub name_en: &'static str,
}

const COUNTRIES: &[CountryConfig] = &[
    // East Asia
    c("KR", "ko", "KR:ko", "Google 뉴스", "주요 뉴스", "한국", "South Korea"),
    c("JP", "ja", "JP:ja", "Google ニュース", "トップニュース", "日本", "Japan"),
    c("CN", "zh-CN", "CN:zh-Hans", "Google 新闻", "焦点新闻", "中国", "China"),
    c("TW", "zh-TW", "TW:zh-Hant", "Google 新聞", "焦點新聞", "台灣", "Taiwan"),
    c("HK", "zh-HK", "HK:zh-Hant", "Google 新聞", "焦點新聞", "香港", "Hong Kong"),
    // Southeast Asia
    c("VN", "vi", "VN:vi", "Google Tin tức", "Tin nổi bật", "Việt Nam", "Vietnam"),
    c("TH", "th", "TH:th", "Google News", "เรื่องเด่น", "ประเทศไทย", "Thailand"),
    c("PH", "en-PH", "PH:en", "Google News", "Top stories", "Philippines", "Philippines"),
    c("MY", "ms-MY", "MY:ms", "Berita Google", "Berita hangat", "Malaysia", "Malaysia"),
    c("SG", "en-SG", "SG:en", "Google News", "Top stories", "Singapore", "Singapore"),
    c("ID", "id", "ID:id", "Google Berita", "Artikel populer", "Indonesia", "Indonesia"),
    // South Asia
    c("IN", "en-IN", "IN:en", "Google News", "Top stories", "India", "India"),
    // West Asia
    c("IL", "he", "IL:he", "חדשות Google", "הכתבות המובילות", "ישראל", "Israel"),
    c("TR", "tr", "TR:tr", "Google Haberler", "En çok okunan haberler", "Türkiye", "Turkey"),
    // Oceania
    c("AU", "en-AU", "AU:en", "Google News", "Top stories", "Australia", "Australia"),
    c("NZ", "en-NZ", "NZ:en", "Google News", "Top stories", "New Zealand", "New Zealand"),
    // Europe
    c("DE", "de", "DE:de", "Google News", "Top-Meldungen", "Deutschland", "Germany"),
    c("FR", "fr", "FR:fr", "Google Actualités", "À la une", "France", "France"),
    c("GB", "en-GB", "GB:en", "Google News", "Top stories", "United Kingdom", "United Kingdom"),
    c("IT", "it", "IT:it", "Google News", "Notizie principali", "Italia", "Italy"),
    c("ES", "es", "ES:es", "Google News", "Noticias destacadas", "España", "Spain"),
    c("NL", "nl", "NL:nl", "Google Nieuws", "Voorpaginanieuws", "Nederland", "Netherlands"),
    c("SE", "sv", "SE:sv", "Google Nyheter", "Huvudnyheter", "Sverige", "Sweden"),
    c("PL", "pl", "PL:pl", "Google News", "Najważniejsze artykuły", "Polska", "Poland"),
    c("RU", "ru", "RU:ru", "Google Новости", "Главные новости", "Россия", "Russia"),
    c("UA", "uk", "UA:uk", "Google Новини", "Головні новини", "Україна", "Ukraine"),
    c("PT", "pt-PT", "PT:pt-150", "Google Notícias", "Notícias principais", "Portugal", "Portugal"),
    // Americas
    c("US", "en-US", "US:en", "Google News", "Top stories", "United States", "United States"),
    c("CA", "en-CA", "CA:en", "Google News", "Top stories", "Canada", "Canada"),
    c("MX", "es-419", "MX:es-419", "Google Noticias", "Noticias destacadas", "México", "Mexico"),
    c("BR", "pt-BR", "BR:pt-419", "Google Notícias", "Principais notícias", "Brasil", "Brazil"),
    c("AR", "es-419", "AR:es-419", "Google Noticias", "Noticias destacadas", "Argentina", "Argentina"),
    // Africa
    c("ZA", "en-ZA", "ZA:en", "Google News", "Top stories", "South Africa", "South Africa"),
    c("NG", "en-NG", "NG:en", "Google News", "Top stories", "Nigeria", "Nigeria"),
    c("EG", "ar", "EG:ar", "أخبار Google", "أهم الأخبار", "مصر", "Egypt"),
];

const fn c(
    code: &'static str,
    hl: &'static str,
    ceid: &'static str,
    brand: &'static str,
    top_label: &'static str,
    name_local: &'static str,
    name_en: &'static str,
) -> CountryConfig {
    CountryConfig {
        code,
        hl,
        ceid,
        brand,
        top_label,
        name_local,
        name_en,
    }
}

/// Look up the feed configuration for a country code
pub fn country_config(code: &str) -> Option<&'static CountryConfig> {
    COUNTRIES.iter().find(|country| country.code == code)
}

/// Flag emoji for an ISO 3166-1 alpha-2 country code, built from regional
/// indicator symbols. Codes that are not two letters get a globe.
pub fn country_flag(code: &str) -> String {
    let code = code.trim();
    if code.len() != 2 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return "🌐".to_string();
    }
    code.chars()
        .filter_map(|ch| char::from_u32(0x1F1E6 + (ch.to_ascii_uppercase() as u32 - 'A' as u32)))
        .collect()
}

/// Localized "Google News" prefix for message headers, keyed by the
/// primary subtag of the feed language
pub fn news_prefix(lang: &str) -> &'static str {
    let primary = lang.split(['-', '_']).next().unwrap_or(lang);
    match primary {
        "ko" => "Google 뉴스",
        "ja" => "Google ニュース",
        "zh" => "Google 新闻",
        "vi" => "Google Tin tức",
        "th" => "Google ข่าว",
        "ms" | "id" => "Google Berita",
        "he" | "iw" => "Google חדשות",
        "ar" => "Google أخبار",
        "tr" => "Google Haberler",
        "ru" => "Google Новости",
        "uk" => "Google Новини",
        "de" => "Google Nachrichten",
        "fr" => "Google Actualités",
        "es" => "Google Noticias",
        "it" => "Google Notizie",
        "nl" => "Google Nieuws",
        "sv" | "no" => "Google Nyheter",
        "da" => "Google Nyheder",
        "fi" => "Google Uutiset",
        "pl" => "Google Wiadomości",
        "pt" => "Google Notícias",
        "cs" => "Google Zprávy",
        "el" => "Google Ειδήσεις",
        "hu" => "Google Hírek",
        "ro" => "Google Știri",
        "bn" => "Google সংবাদ",
        _ => "Google News",
    }
}

/// Pull the `hl` language param out of a feed URL, defaulting to English
pub fn language_from_url(url: &str) -> String {
    regex::Regex::new(r"[?&]hl=([\w-]+)")
        .ok()
        .and_then(|re| re.captures(url).map(|c| c[1].to_string()))
        .unwrap_or_else(|| "en".to_string())
}

/// Pull the `gl` country param out of a feed URL
pub fn country_from_url(url: &str) -> Option<String> {
    regex::Regex::new(r"[?&]gl=(\w+)")
        .ok()
        .and_then(|re| re.captures(url).map(|c| c[1].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_config_lookup() {
        let kr = country_config("KR").unwrap();
        assert_eq!(kr.hl, "ko");
        assert_eq!(kr.ceid, "KR:ko");
        assert_eq!(kr.top_label, "주요 뉴스");
        assert!(country_config("XX").is_none());
    }

    #[test]
    fn test_country_flag() {
        assert_eq!(country_flag("KR"), "🇰🇷");
        assert_eq!(country_flag("us"), "🇺🇸");
        assert_eq!(country_flag(""), "🌐");
        assert_eq!(country_flag("KOR"), "🌐");
    }

    #[test]
    fn test_news_prefix_uses_primary_subtag() {
        assert_eq!(news_prefix("ko"), "Google 뉴스");
        assert_eq!(news_prefix("en-US"), "Google News");
        assert_eq!(news_prefix("pt-BR"), "Google Notícias");
        assert_eq!(news_prefix("tlh"), "Google News");
    }

    #[test]
    fn test_params_from_url() {
        let url = "https://news.google.com/rss/topics/CAAqAAA?hl=ko&gl=KR&ceid=KR%3Ako";
        assert_eq!(language_from_url(url), "ko");
        assert_eq!(country_from_url(url), Some("KR".to_string()));
    }
}
