//! Session module for persisted and resumable crawl state
//!
//! # Components
//!
//! - `Session`: timestamps, frontier, visited URLs and per-domain results
//! - `Frontier`: the external and internal URL stacks with the breadth/depth policy
//! - `DomainResult`: cookies found on one hostname, merged by `merge_domain_result`
//! - store functions: create, resume, load and save sessions

mod aggregate;
mod frontier;
mod store;
mod types;

// Re-export main types
pub use aggregate::merge_domain_result;
pub use frontier::{Frontier, FrontierSource, MIN_EXTERNALS};
pub use store::{
    continue_session, create_session, load_session, parse_session, save_session,
    validate_session_value,
};
pub use types::{DomainResult, Session, VisitedUrls};
