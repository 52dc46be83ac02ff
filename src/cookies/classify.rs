use crate::cookies::parser::parse_set_cookie_headers;
use crate::cookies::Cookie;
use reqwest::header::{HeaderMap, SET_COOKIE};
use std::collections::BTreeMap;

/// Cookies of one response, keyed by name and split by lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    pub persistent: BTreeMap<String, Cookie>,
    pub session: BTreeMap<String, Cookie>,
}

impl CookieJar {
    /// Buckets cookies as persistent or session
    ///
    /// A later cookie with the same name replaces an earlier one.
    pub fn from_cookies<I>(cookies: I) -> Self
    where
        I: IntoIterator<Item = Cookie>,
    {
        let mut jar = Self::default();
        for cookie in cookies {
            let bucket = if cookie.is_persistent() {
                &mut jar.persistent
            } else {
                &mut jar.session
            };
            bucket.insert(cookie.name.clone(), cookie);
        }
        jar
    }

    /// Parses and buckets every `Set-Cookie` header of a response
    ///
    /// A response without `Set-Cookie` yields an empty jar.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let values = headers.get_all(SET_COOKIE).iter().filter_map(|value| {
            let value = value.to_str().ok();
            if value.is_none() {
                tracing::warn!("Skipping Set-Cookie header that is not valid text");
            }
            value
        });

        Self::from_cookies(parse_set_cookie_headers(values))
    }

    /// Total number of cookies
    pub fn len(&self) -> usize {
        self.persistent.len() + self.session.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persistent.is_empty() && self.session.is_empty()
    }
}

/// Finds cookies that only appear when a privacy header is sent
///
/// A cookie from `privacy` is tracking when no cookie of the same name exists in the same
/// category of `plain`. Only names are compared. When both jars hold the same number of
/// persistent and session cookies nothing is reported.
pub fn detect_tracking(plain: &CookieJar, privacy: &CookieJar) -> BTreeMap<String, Cookie> {
    let mut tracking = BTreeMap::new();

    if plain.persistent.len() == privacy.persistent.len()
        && plain.session.len() == privacy.session.len()
    {
        return tracking;
    }

    for (baseline, candidates) in [
        (&plain.persistent, &privacy.persistent),
        (&plain.session, &privacy.session),
    ] {
        for (name, cookie) in candidates {
            if !baseline.contains_key(name) {
                tracking.insert(name.clone(), cookie.clone());
            }
        }
    }

    tracking
}
