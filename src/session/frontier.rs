//! URL frontier for the crawl
//!
//! The frontier holds two LIFO stacks:
//! - the external stack, persisted with the session, holding links to other domains and seeds
//! - the internal stack, transient, holding links of the domain currently being explored
//!
//! Selection prefers breadth across domains once at least [`MIN_EXTERNALS`] external
//! candidates exist and falls back to the internal stack otherwise.

use serde::{Deserialize, Serialize};

/// External frontier size at which the crawler stops exploring the current domain
pub const MIN_EXTERNALS: usize = 2;

/// Which stack a URL was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontierSource {
    External,
    Internal,
}

/// The URLs discovered but not yet fetched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontier {
    #[serde(rename = "urls")]
    external: Vec<String>,

    #[serde(skip)]
    internal: Vec<String>,
}

impl Frontier {
    /// Creates a frontier with a single external URL
    pub fn with_seed(url: impl Into<String>) -> Self {
        Self {
            external: vec![url.into()],
            internal: Vec::new(),
        }
    }

    /// Pops the next URL to crawl
    ///
    /// # Selection Policy
    ///
    /// 1. At least `MIN_EXTERNALS` external URLs → pop external
    /// 2. Otherwise, any internal URL → pop internal
    /// 3. Otherwise → pop whatever external URL is left
    pub fn next_url(&mut self) -> Option<(String, FrontierSource)> {
        if self.external.len() >= MIN_EXTERNALS {
            return self.external.pop().map(|url| (url, FrontierSource::External));
        }

        if let Some(url) = self.internal.pop() {
            return Some((url, FrontierSource::Internal));
        }

        self.external.pop().map(|url| (url, FrontierSource::External))
    }

    /// Pushes an external URL unless it is already queued
    ///
    /// Returns true if the URL was added.
    pub fn push_external(&mut self, url: &str) -> bool {
        if self.contains(url) {
            return false;
        }
        self.external.push(url.to_string());
        true
    }

    /// Decides what happens to the internal links staged from the last page
    ///
    /// With fewer than `MIN_EXTERNALS` external URLs the staged links are pushed onto the
    /// internal stack (minus duplicates and anything `is_visited` reports). Otherwise the
    /// internal stack is discarded. Returns the number of links committed.
    pub fn settle_internal<'a, I, F>(&mut self, staged: I, external_len: usize, is_visited: F) -> usize
    where
        I: IntoIterator<Item = &'a String>,
        F: Fn(&str) -> bool,
    {
        if external_len >= MIN_EXTERNALS {
            self.internal.clear();
            return 0;
        }

        let mut committed = 0;
        for url in staged {
            if !is_visited(url) && !self.contains(url) {
                self.internal.push(url.clone());
                committed += 1;
            }
        }
        committed
    }

    /// Removes a URL from both stacks
    pub fn remove(&mut self, url: &str) {
        self.external.retain(|queued| queued != url);
        self.internal.retain(|queued| queued != url);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.external.iter().any(|queued| queued == url)
            || self.internal.iter().any(|queued| queued == url)
    }

    pub fn is_empty(&self) -> bool {
        self.external.is_empty() && self.internal.is_empty()
    }

    pub fn external(&self) -> &[String] {
        &self.external
    }

    pub fn internal(&self) -> &[String] {
        &self.internal
    }

    /// Total number of queued URLs
    pub fn len(&self) -> usize {
        self.external.len() + self.internal.len()
    }
}
