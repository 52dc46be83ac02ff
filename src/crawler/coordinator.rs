//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop. For every URL taken from the frontier it:
//! - fetches the page without a privacy header, following redirects
//! - extracts links and queues new external ones
//! - fetches the same page again with the configured privacy header
//! - compares the cookies of both fetches to find tracking cookies
//! - merges the cookies into the result of the page's domain
//! - decides whether to keep exploring the current domain

use crate::config::Settings;
use crate::cookies::{detect_tracking, CookieJar};
use crate::crawler::events::{AbortHandle, CrawlEvent};
use crate::crawler::extractor::{LinkExtractor, PatternExtractor};
use crate::crawler::fetcher::{FetchResult, Fetcher, HeaderProfile};
use crate::session::{merge_domain_result, Session};
use crate::url::domain_of;
use crate::{Result, TrackerError, UrlError};
use reqwest::header::HeaderMap;
use std::collections::HashSet;
use tokio::sync::mpsc::UnboundedSender;

/// Maximum number of redirects followed for one fetch
pub const MAX_REDIRECTS: usize = 5;

/// How a crawl ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStatus {
    /// The frontier was exhausted
    Completed,
    /// An abort was requested
    Aborted,
    /// Single-page mode stopped after the first page
    SinglePage,
}

/// The outcome of a crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub status: CrawlStatus,
    pub session: Session,
}

/// How redirect chains are guarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RedirectGuard {
    /// Stop after `MAX_REDIRECTS` hops
    Bounded,
    /// Additionally stop as soon as a hop repeats an earlier URL of the chain
    BoundedNoRepeat,
}

/// A successfully fetched page at the end of a redirect chain
struct FetchedPage {
    url: String,
    headers: HeaderMap,
    body: String,
}

/// Main crawler structure
///
/// Holds the settings and collaborators for crawling; the session itself is passed into
/// [`Crawler::crawl`] and handed back when the loop ends.
pub struct Crawler {
    settings: Settings,
    fetcher: Fetcher,
    extractor: Box<dyn LinkExtractor + Send + Sync>,
    abort: AbortHandle,
    events: Option<UnboundedSender<CrawlEvent>>,
}

impl Crawler {
    /// Creates a crawler with a fetcher built from the settings
    pub fn new(settings: Settings) -> Result<Self> {
        let fetcher = Fetcher::new(&settings)?;
        Ok(Self::with_fetcher(settings, fetcher))
    }

    /// Creates a crawler around an existing fetcher
    pub fn with_fetcher(settings: Settings, fetcher: Fetcher) -> Self {
        Self {
            settings,
            fetcher,
            extractor: Box::new(PatternExtractor::new()),
            abort: AbortHandle::default(),
            events: None,
        }
    }

    /// Replaces the link extractor
    pub fn with_extractor<E>(mut self, extractor: E) -> Self
    where
        E: LinkExtractor + Send + Sync + 'static,
    {
        self.extractor = Box::new(extractor);
        self
    }

    /// Sends progress events to the given channel
    pub fn with_events(mut self, events: UnboundedSender<CrawlEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Returns a handle that can abort a running crawl
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs the crawl loop until the frontier is empty, an abort is requested, or, in
    /// single-page mode, one URL was processed
    ///
    /// Errors for single URLs are logged and the URL is skipped; nothing inside the loop
    /// ends the crawl.
    pub async fn crawl(&self, mut session: Session) -> CrawlReport {
        self.abort.start();
        self.emit(CrawlEvent::Started {
            frontier: session.frontier.len(),
        });
        tracing::info!(
            "Starting crawl with {} queued and {} visited URLs",
            session.frontier.len(),
            session.visited.len()
        );

        let mut status = CrawlStatus::Completed;
        let mut pages_processed = 0usize;
        let start_time = std::time::Instant::now();

        loop {
            if self.abort.is_requested() {
                tracing::info!("Abort requested, stopping crawl");
                status = CrawlStatus::Aborted;
                break;
            }

            let Some((url, source)) = session.frontier.next_url() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            if session.visited.contains(&url) {
                tracing::debug!("Skipping already visited {}", url);
                continue;
            }

            tracing::debug!("Processing {} from {:?} frontier", url, source);

            if let Err(e) = self.process_url(&mut session, &url).await {
                tracing::warn!("Skipping {}: {}", url, e);
            }

            pages_processed += 1;
            session.touch();

            if self.settings.is_single_page() {
                tracing::info!("Single-page mode, stopping after {}", url);
                status = CrawlStatus::SinglePage;
                break;
            }
        }

        self.abort.finish();

        tracing::info!(
            "Crawl finished ({:?}): {} URLs processed in {:?}, {} domains with results",
            status,
            pages_processed,
            start_time.elapsed(),
            session.results.len()
        );

        self.emit(CrawlEvent::Finished {
            status,
            session: Box::new(session.clone()),
        });

        CrawlReport { status, session }
    }

    /// Processes a single URL
    async fn process_url(&self, session: &mut Session, url: &str) -> Result<()> {
        session.mark_visited(url);

        let page = self
            .fetch_following(session, url, HeaderProfile::Plain, RedirectGuard::Bounded)
            .await?;

        let domain = domain_of(&page.url).ok_or(UrlError::MissingDomain)?;
        tracing::info!("Visited {}", page.url);
        self.emit(CrawlEvent::Visited {
            url: page.url.clone(),
            domain: domain.clone(),
            visited: session.visited.len(),
        });

        // Queue new external links; internal ones wait for the frontier decision below
        let links = self.extractor.extract(&page.body, &domain);
        let mut queued = 0;
        for link in &links.external {
            if !session.is_known(link) && session.frontier.push_external(link) {
                queued += 1;
            }
        }
        let external_len = session.frontier.external().len();
        tracing::debug!(
            "{}: {} internal links, {} external links ({} new)",
            page.url,
            links.internal.len(),
            links.external.len(),
            queued
        );

        let plain_cookies = CookieJar::from_headers(&page.headers);

        let privacy_page = self
            .fetch_following(
                session,
                &page.url,
                self.settings.header.into(),
                RedirectGuard::BoundedNoRepeat,
            )
            .await?;
        let privacy_cookies = CookieJar::from_headers(&privacy_page.headers);

        let tracking = detect_tracking(&plain_cookies, &privacy_cookies);
        if !tracking.is_empty() {
            tracing::info!("{} tracking cookies on {}", tracking.len(), domain);
        }

        merge_domain_result(
            &mut session.results,
            &domain,
            plain_cookies.persistent,
            plain_cookies.session,
            tracking,
        );

        let visited = &session.visited;
        let committed =
            session
                .frontier
                .settle_internal(&links.internal, external_len, |link| visited.contains(link));
        tracing::debug!("Committed {} internal links for {}", committed, domain);

        Ok(())
    }

    /// Fetches a URL and follows its redirects
    ///
    /// Every redirect target is marked visited. The chain is abandoned after
    /// `MAX_REDIRECTS` hops or, with `RedirectGuard::BoundedNoRepeat`, when it revisits a URL.
    async fn fetch_following(
        &self,
        session: &mut Session,
        url: &str,
        profile: HeaderProfile,
        guard: RedirectGuard,
    ) -> Result<FetchedPage> {
        let mut current = url.to_string();
        let mut chain = HashSet::from([current.clone()]);
        let mut redirects = 0;
        let mut result = self.fetcher.fetch(&current, profile).await;

        loop {
            match result {
                FetchResult::Success { headers, body, .. } => {
                    return Ok(FetchedPage {
                        url: current,
                        headers,
                        body,
                    });
                }
                FetchResult::Redirect { location, .. } => {
                    if redirects >= MAX_REDIRECTS {
                        return Err(TrackerError::RedirectLimit {
                            url: url.to_string(),
                        });
                    }
                    if guard == RedirectGuard::BoundedNoRepeat && !chain.insert(location.clone()) {
                        return Err(TrackerError::RedirectLoop { url: location });
                    }

                    redirects += 1;
                    tracing::debug!("Redirect {} of {}: {}", redirects, url, location);
                    session.mark_visited(&location);
                    current = location;
                    result = self.fetcher.fetch(&current, profile).await;
                }
                FetchResult::HttpError { status_code } => {
                    return Err(TrackerError::Status {
                        url: current,
                        status: status_code,
                    });
                }
                FetchResult::NetworkError { error } => {
                    return Err(TrackerError::Transport {
                        url: current,
                        message: error,
                    });
                }
            }
        }
    }

    fn emit(&self, event: CrawlEvent) {
        if let Some(events) = &self.events {
            // Receivers may have gone away; progress events are best effort
            let _ = events.send(event);
        }
    }
}
