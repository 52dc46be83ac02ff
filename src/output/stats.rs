//! Cookie statistics for a session
//!
//! This module counts the cookies recorded in a session, either across all domains or for a
//! single domain, and prints the counts for the command line.

use crate::session::Session;

/// Which part of a session to evaluate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every domain with results
    All,
    /// A single domain
    Domain(String),
}

/// Cookie counts for a session or one of its domains
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStatistics {
    /// Number of domains that were counted
    pub domains: usize,

    pub persistent_cookies: usize,
    pub session_cookies: usize,
    pub tracking_cookies: usize,
}

impl SessionStatistics {
    /// Total number of cookies over all categories
    pub fn total(&self) -> usize {
        self.persistent_cookies + self.session_cookies + self.tracking_cookies
    }

    /// Returns true when no cookie was found at all
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Counts the cookies of a session
///
/// A domain without results counts as zero cookies.
///
/// # Arguments
///
/// * `session` - The session to evaluate
/// * `scope` - Whether to count all domains or only one
pub fn evaluate_session(session: &Session, scope: &Scope) -> SessionStatistics {
    let mut stats = SessionStatistics::default();

    let domains: Vec<_> = match scope {
        Scope::All => session.results.values().collect(),
        Scope::Domain(domain) => session.results.get(domain).into_iter().collect(),
    };

    for result in domains {
        stats.domains += 1;
        stats.persistent_cookies += result.persistent_cookies.len();
        stats.session_cookies += result.session_cookies.len();
        stats.tracking_cookies += result.tracking_cookies.len();
    }

    stats
}

/// Prints session statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `session` - The session the statistics were computed for
/// * `stats` - The statistics to display
pub fn print_statistics(session: &Session, stats: &SessionStatistics) {
    println!("=== Cookie Statistics ===\n");

    println!("Overview:");
    println!("  URLs visited: {}", session.visited.len());
    println!("  URLs queued: {}", session.frontier.len());
    println!("  Domains with results: {}", stats.domains);
    println!();

    if stats.is_empty() {
        println!("No cookies found");
        return;
    }

    println!("Cookies by Category:");
    let total = stats.total();
    for (label, count) in [
        ("Persistent", stats.persistent_cookies),
        ("Session", stats.session_cookies),
        ("Tracking", stats.tracking_cookies),
    ] {
        let percentage = (count as f64 / total as f64) * 100.0;
        println!("  {}: {} ({:.1}%)", label, count, percentage);
    }
    println!();

    let mut trackers: Vec<_> = session
        .results
        .iter()
        .filter(|(_, result)| !result.tracking_cookies.is_empty())
        .map(|(domain, result)| (domain, result.tracking_cookies.len()))
        .collect();
    trackers.sort_by(|a, b| b.1.cmp(&a.1));

    if !trackers.is_empty() {
        println!("Domains with Tracking Cookies ({}):", trackers.len());
        for (domain, count) in trackers {
            println!("  - {} ({})", domain, count);
        }
    }
}
