use crate::cookies::Cookie;
use crate::session::frontier::Frontier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Accumulated cookie classification for one hostname
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainResult {
    #[serde(deserialize_with = "named_cookies::deserialize")]
    pub persistent_cookies: BTreeMap<String, Cookie>,
    #[serde(deserialize_with = "named_cookies::deserialize")]
    pub session_cookies: BTreeMap<String, Cookie>,
    #[serde(deserialize_with = "named_cookies::deserialize")]
    pub tracking_cookies: BTreeMap<String, Cookie>,
}

impl DomainResult {
    /// Total number of cookies in all three categories
    pub fn cookie_count(&self) -> usize {
        self.persistent_cookies.len() + self.session_cookies.len() + self.tracking_cookies.len()
    }
}

/// URLs already fetched, in visit order
///
/// Serialized as a plain JSON array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct VisitedUrls {
    order: Vec<String>,
    index: HashSet<String>,
}

impl VisitedUrls {
    /// Records a URL; returns false if it was already visited
    pub fn insert(&mut self, url: &str) -> bool {
        if !self.index.insert(url.to_string()) {
            return false;
        }
        self.order.push(url.to_string());
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains(url)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.order
    }
}

impl From<Vec<String>> for VisitedUrls {
    fn from(urls: Vec<String>) -> Self {
        let mut visited = Self::default();
        for url in &urls {
            visited.insert(url);
        }
        visited
    }
}

impl From<VisitedUrls> for Vec<String> {
    fn from(visited: VisitedUrls) -> Self {
        visited.order
    }
}

impl PartialEq for VisitedUrls {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for VisitedUrls {}

/// The persisted and resumable state of a crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub start: DateTime<Utc>,

    /// Time the last URL was processed; unset until then
    #[serde(with = "optional_date")]
    pub end: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub frontier: Frontier,

    #[serde(rename = "urls_done")]
    pub visited: VisitedUrls,

    pub results: BTreeMap<String, DomainResult>,
}

impl Session {
    /// Creates a session whose frontier holds only `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            start: Utc::now(),
            end: None,
            frontier: Frontier::with_seed(url),
            visited: VisitedUrls::default(),
            results: BTreeMap::new(),
        }
    }

    /// Returns true if the URL was fetched already or is waiting in the frontier
    pub fn is_known(&self, url: &str) -> bool {
        self.visited.contains(url) || self.frontier.contains(url)
    }

    /// Marks a URL as fetched
    ///
    /// The URL is removed from the frontier so it never sits in both places.
    pub fn mark_visited(&mut self, url: &str) {
        self.frontier.remove(url);
        self.visited.insert(url);
    }

    /// Stamps the end time
    pub fn touch(&mut self) {
        self.end = Some(Utc::now());
    }
}

/// Reads a cookie map, taking each cookie's name from its key
mod named_cookies {
    use crate::cookies::Cookie;
    use serde::{Deserialize, Deserializer};
    use std::collections::BTreeMap;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<String, Cookie>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut cookies = BTreeMap::<String, Cookie>::deserialize(deserializer)?;
        for (name, cookie) in cookies.iter_mut() {
            cookie.name = name.clone();
        }
        Ok(cookies)
    }
}

/// Serializes an unset date as `""` and accepts `""`, `null` or an RFC 3339 date
mod optional_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.to_rfc3339()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => DateTime::parse_from_rfc3339(value)
                .map(|date| Some(date.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
        }
    }
}
