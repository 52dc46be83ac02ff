//! Cookie module
//!
//! This module turns `Set-Cookie` headers into structured cookies and sorts them into the
//! categories the crawler reports:
//! - persistent cookies carry an expiry (explicit or derived from `Max-Age`)
//! - session cookies carry none
//! - tracking cookies only show up when a privacy header was sent

mod classify;
mod parser;

pub use classify::{detect_tracking, CookieJar};
pub use parser::{parse_cookie, parse_cookie_at, parse_set_cookie_headers, split_cookies_string};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cookie as set by a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    /// Cookie name; in a session file the key of the cookie map is authoritative
    #[serde(default)]
    pub name: String,

    pub value: String,

    /// Absolute expiry; derived from `max_age` when only that was sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,

    /// Lifetime in seconds as sent by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub secure: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub http_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

impl Cookie {
    /// Creates a cookie without any attributes
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires: None,
            max_age: None,
            domain: None,
            path: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }

    /// Returns true if the cookie outlives the browsing session
    pub fn is_persistent(&self) -> bool {
        self.expires.is_some() || self.max_age.is_some()
    }
}
