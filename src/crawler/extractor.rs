//! Link extraction from page bodies
//!
//! The default [`PatternExtractor`] is a narrow lexical scan for
//! `href="http(s)://..."` attributes using the character class `[a-zA-Z0-9/?=:._-]`. It misses
//! single-quoted attributes, relative links and URLs with other characters.
//! [`DocumentExtractor`] parses the page with `scraper` instead and can be swapped in through
//! [`LinkExtractor`].
//!
//! Both extractors:
//! - keep absolute `http`/`https` URLs only
//! - drop font and stylesheet resources (`font` anywhere, `.ttf`, `.otf`, `.css`)
//! - sort the rest into internal (host equals the current domain) and external links

use crate::url::domain_of;
use regex::Regex;
use scraper::{Html, Selector};

/// Pattern for double-quoted absolute `href` attributes
const HREF_PATTERN: &str = r#"href="https?://[a-zA-Z0-9/?=:._-]*""#;

/// Links found on one page, deduplicated in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    pub internal: Vec<String>,
    pub external: Vec<String>,
}

impl ExtractedLinks {
    /// Sorts one absolute URL into the internal or external list
    ///
    /// Unparsable URLs and font/stylesheet resources are dropped.
    fn add(&mut self, url: &str, domain: &str) {
        if is_font_or_stylesheet(url) {
            return;
        }

        let Some(host) = domain_of(url) else {
            return;
        };

        let bucket = if host == domain {
            &mut self.internal
        } else {
            &mut self.external
        };

        if !bucket.iter().any(|known| known == url) {
            bucket.push(url.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.internal.is_empty() && self.external.is_empty()
    }
}

/// Finds hyperlinks in a page body
pub trait LinkExtractor {
    /// Extracts links from `body`, classifying them against the current `domain`
    fn extract(&self, body: &str, domain: &str) -> ExtractedLinks;
}

/// Regex-based `href` scanner
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    href: Regex,
}

impl PatternExtractor {
    pub fn new() -> Self {
        Self {
            href: Regex::new(HREF_PATTERN).expect("href pattern is a valid regex"),
        }
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkExtractor for PatternExtractor {
    fn extract(&self, body: &str, domain: &str) -> ExtractedLinks {
        let mut links = ExtractedLinks::default();

        for found in self.href.find_iter(body) {
            // strip `href="` and the closing quote
            let matched = found.as_str();
            let url = &matched[6..matched.len() - 1];
            links.add(url, domain);
        }

        links
    }
}

/// HTML parser based extractor reading `<a href>` elements
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExtractor;

impl LinkExtractor for DocumentExtractor {
    fn extract(&self, body: &str, domain: &str) -> ExtractedLinks {
        let mut links = ExtractedLinks::default();
        let document = Html::parse_document(body);

        if let Ok(selector) = Selector::parse("a[href]") {
            for element in document.select(&selector) {
                let Some(href) = element.value().attr("href") else {
                    continue;
                };
                let href = href.trim();

                if href.starts_with("http://") || href.starts_with("https://") {
                    links.add(href, domain);
                }
            }
        }

        links
    }
}

/// Returns true for URLs that look like fonts or stylesheets
fn is_font_or_stylesheet(url: &str) -> bool {
    url.contains("font") || url.ends_with(".ttf") || url.ends_with(".otf") || url.ends_with(".css")
}
