//! Cookie Tracker: a privacy-signal cookie crawler
//!
//! This crate crawls websites one page at a time, fetching every page twice (once plain and
//! once with a Do-Not-Track or Global-Privacy-Control header) and classifying the cookies
//! each domain sets as persistent, session or tracking.

pub mod config;
pub mod cookies;
pub mod crawler;
pub mod output;
pub mod session;
pub mod url;

use thiserror::Error;

/// Main error type for Cookie Tracker operations
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Download of {url} not successful, status code {status}")]
    Status { url: String, status: u16 },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Too many redirects from {url}")]
    RedirectLimit { url: String },

    #[error("Redirect loop detected at {url}")]
    RedirectLoop { url: String },
}

/// Settings-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Errors raised while creating, resuming or persisting a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Not a valid start URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("Illegal session JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session is not a JSON object")]
    NotAnObject,

    #[error("Session is missing required field '{0}'")]
    MissingField(String),

    #[error("Result for domain '{domain}' is missing required field '{field}'")]
    MissingDomainField { domain: String, field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Cookie Tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Result type alias for settings operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

/// Result type alias for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

// Re-export commonly used types
pub use config::Settings;
pub use cookies::{Cookie, CookieJar};
pub use crawler::{AbortHandle, CrawlEvent, CrawlReport, CrawlStatus, Crawler};
pub use session::{create_session, continue_session, DomainResult, Session};
pub use url::extract_domain;
