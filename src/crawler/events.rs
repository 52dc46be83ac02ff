//! Progress events and cooperative abort

use crate::crawler::CrawlStatus;
use crate::session::Session;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Progress notifications sent while a crawl runs
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    /// The crawl loop started
    Started {
        /// URLs waiting in the frontier
        frontier: usize,
    },

    /// A page was fetched
    Visited {
        url: String,
        domain: String,
        /// Number of URLs visited so far
        visited: usize,
    },

    /// The crawl loop returned
    Finished {
        status: CrawlStatus,
        session: Box<Session>,
    },
}

/// Creates a channel for crawl events
pub fn event_channel() -> (
    mpsc::UnboundedSender<CrawlEvent>,
    mpsc::UnboundedReceiver<CrawlEvent>,
) {
    mpsc::unbounded_channel()
}

/// Requests a graceful stop of a running crawl
///
/// The request is checked before each URL is taken from the frontier; a page that is being
/// processed is always finished first.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    running: Arc<AtomicBool>,
    requested: Arc<AtomicBool>,
}

impl AbortHandle {
    /// Requests an abort
    ///
    /// Has no effect unless a crawl is running. Returns true if the request was recorded.
    pub fn abort(&self) -> bool {
        if !self.running.load(Ordering::SeqCst) {
            return false;
        }
        self.requested.store(true, Ordering::SeqCst);
        true
    }

    /// Returns true while a crawl is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub(crate) fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    pub(crate) fn start(&self) {
        self.requested.store(false, Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);
    }

    pub(crate) fn finish(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.requested.store(false, Ordering::SeqCst);
    }
}
