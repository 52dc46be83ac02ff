use crate::cookies::Cookie;
use crate::session::DomainResult;
use std::collections::BTreeMap;

/// Merges newly classified cookies into the result of a domain
///
/// A missing domain entry is created from the given maps. An existing entry receives every
/// cookie of each category; a cookie with a name already present replaces the old one.
pub fn merge_domain_result(
    results: &mut BTreeMap<String, DomainResult>,
    domain: &str,
    persistent: BTreeMap<String, Cookie>,
    session: BTreeMap<String, Cookie>,
    tracking: BTreeMap<String, Cookie>,
) {
    match results.get_mut(domain) {
        Some(existing) => {
            existing.persistent_cookies.extend(persistent);
            existing.session_cookies.extend(session);
            existing.tracking_cookies.extend(tracking);
        }
        None => {
            results.insert(
                domain.to_string(),
                DomainResult {
                    persistent_cookies: persistent,
                    session_cookies: session,
                    tracking_cookies: tracking,
                },
            );
        }
    }
}
