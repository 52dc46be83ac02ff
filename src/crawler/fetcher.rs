//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests with a plain, DNT or GPC header profile
//! - Reporting redirects instead of following them
//! - Error classification

use crate::config::{PrivacyHeader, Settings, UserAgent};
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// User agent sent when no custom one is configured
pub const GENERIC_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0";

/// Default total timeout of a single request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout of a single request
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which extra header a request carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderProfile {
    /// No privacy header
    Plain,
    /// `DNT: 1`
    Dnt,
    /// `Sec-GPC: 1`
    Gpc,
}

impl HeaderProfile {
    /// The header name and value this profile adds, if any
    pub fn header(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Plain => None,
            Self::Dnt => Some(("DNT", "1")),
            Self::Gpc => Some(("Sec-GPC", "1")),
        }
    }
}

impl From<PrivacyHeader> for HeaderProfile {
    fn from(header: PrivacyHeader) -> Self {
        match header {
            PrivacyHeader::Dnt => Self::Dnt,
            PrivacyHeader::Gpc => Self::Gpc,
        }
    }
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// HTTP 200 with the full body
    Success {
        /// The requested URL
        url: String,
        /// HTTP status code
        status_code: u16,
        /// Response headers, including every `Set-Cookie`
        headers: HeaderMap,
        /// Page body content
        body: String,
    },

    /// HTTP 301 or 302
    Redirect {
        /// HTTP status code
        status_code: u16,
        /// Absolute redirect target, resolved against the requested URL
        location: String,
    },

    /// Any other HTTP status, or a redirect without a usable `Location`
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, truncated body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are never followed by the client; the crawler follows them itself so it can
/// count and record every hop.
///
/// # Example
///
/// ```no_run
/// use cookie_tracker::config::Settings;
/// use cookie_tracker::crawler::{build_http_client, REQUEST_TIMEOUT};
///
/// let client = build_http_client(&Settings::default(), REQUEST_TIMEOUT).unwrap();
/// ```
pub fn build_http_client(settings: &Settings, timeout: Duration) -> Result<Client, reqwest::Error> {
    let user_agent = match &settings.user_agent {
        UserAgent::Generic => GENERIC_USER_AGENT,
        UserAgent::Custom(value) => value.as_str(),
    };

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues single GET requests
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher with the default request timeout
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        Self::with_timeout(settings, REQUEST_TIMEOUT)
    }

    /// Creates a fetcher with a custom request timeout
    pub fn with_timeout(settings: &Settings, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(settings, timeout)?,
        })
    }

    /// Fetches a URL once
    ///
    /// | Response | Result |
    /// |----------|--------|
    /// | 200 | `Success` with headers and body |
    /// | 301 / 302 | `Redirect` to the resolved `Location` |
    /// | anything else | `HttpError` |
    /// | transport failure | `NetworkError` |
    pub async fn fetch(&self, url: &str, profile: HeaderProfile) -> FetchResult {
        let mut request = self.client.get(url);
        if let Some((name, value)) = profile.header() {
            request = request.header(name, value);
        }

        tracing::debug!("GET {} ({:?})", url, profile);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return classify_transport_error(e),
        };

        let status = response.status();

        if status == StatusCode::MOVED_PERMANENTLY || status == StatusCode::FOUND {
            return match resolve_location(url, response.headers()) {
                Some(location) => {
                    tracing::debug!("{} redirects to {}", url, location);
                    FetchResult::Redirect {
                        status_code: status.as_u16(),
                        location,
                    }
                }
                None => {
                    tracing::debug!("{} redirects without a usable Location", url);
                    FetchResult::HttpError {
                        status_code: status.as_u16(),
                    }
                }
            };
        }

        if status != StatusCode::OK {
            return FetchResult::HttpError {
                status_code: status.as_u16(),
            };
        }

        let headers = response.headers().clone();

        match response.text().await {
            Ok(body) => FetchResult::Success {
                url: url.to_string(),
                status_code: status.as_u16(),
                headers,
                body,
            },
            Err(e) => FetchResult::NetworkError {
                error: e.to_string(),
            },
        }
    }
}

/// Resolves a `Location` header against the URL that returned it
fn resolve_location(url: &str, headers: &HeaderMap) -> Option<String> {
    let location = headers.get(LOCATION)?.to_str().ok()?;
    let base = Url::parse(url).ok()?;
    base.join(location.trim()).ok().map(|resolved| resolved.to_string())
}

fn classify_transport_error(e: reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    };

    FetchResult::NetworkError { error }
}
