/// User agent used for every request of a crawl
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UserAgent {
    /// A fixed, browser-like user agent string
    #[default]
    Generic,

    /// A user supplied user agent string
    Custom(String),
}

/// Privacy-signaling header sent on the second fetch of every page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrivacyHeader {
    /// `DNT: 1` (Do-Not-Track)
    #[default]
    Dnt,

    /// `Sec-GPC: 1` (Global Privacy Control)
    Gpc,
}

/// Traversal mode of the crawler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlMode {
    /// Keep crawling until the frontier is exhausted or the crawl is aborted
    #[default]
    Breadth,

    /// Stop after the first processed URL
    SinglePage,
}

/// Crawl settings
///
/// Supplied before a crawl starts and never changed while it runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    pub user_agent: UserAgent,
    pub header: PrivacyHeader,
    pub mode: CrawlMode,
}

impl Settings {
    /// Returns true if the crawler should stop after one page
    pub fn is_single_page(&self) -> bool {
        matches!(self.mode, CrawlMode::SinglePage)
    }
}
