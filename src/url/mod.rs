//! URL handling module for Cookie Tracker
//!
//! This module provides hostname extraction and start URL validation.

mod domain;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::{domain_of, extract_domain};

/// Parses and validates a URL the crawler can fetch
///
/// The URL must be absolute, use the `http` or `https` scheme and carry a host.
///
/// # Examples
///
/// ```
/// use cookie_tracker::url::parse_web_url;
///
/// assert!(parse_web_url("https://example.com/").is_ok());
/// assert!(parse_web_url("ftp://example.com/").is_err());
/// assert!(parse_web_url("not a url").is_err());
/// ```
pub fn parse_web_url(input: &str) -> UrlResult<Url> {
    let url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", input, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}
