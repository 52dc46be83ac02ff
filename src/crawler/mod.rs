//! Crawler module for page fetching and cookie analysis
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with plain, DNT and GPC header profiles
//! - Link extraction from page bodies
//! - Progress events and cooperative abort
//! - Overall crawl coordination

mod coordinator;
mod events;
mod extractor;
mod fetcher;

pub use coordinator::{CrawlReport, CrawlStatus, Crawler, MAX_REDIRECTS};
pub use events::{event_channel, AbortHandle, CrawlEvent};
pub use extractor::{DocumentExtractor, ExtractedLinks, LinkExtractor, PatternExtractor};
pub use fetcher::{
    build_http_client, FetchResult, Fetcher, HeaderProfile, CONNECT_TIMEOUT, GENERIC_USER_AGENT,
    REQUEST_TIMEOUT,
};

use crate::config::Settings;
use crate::session::Session;
use crate::Result;

/// Runs a complete crawl with the given settings
///
/// This is the main entry point for a one-off crawl. It builds a [`Crawler`] and runs it
/// over `session` until the frontier is exhausted.
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The crawl ran; the report holds the updated session
/// * `Err(TrackerError)` - The HTTP client could not be built
pub async fn crawl(settings: Settings, session: Session) -> Result<CrawlReport> {
    let crawler = Crawler::new(settings)?;
    Ok(crawler.crawl(session).await)
}
