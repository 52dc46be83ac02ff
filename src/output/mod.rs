//! Output module for reporting crawl results
//!
//! This module handles:
//! - Counting the cookies recorded in a session
//! - Printing statistics to the terminal
//! - Writing markdown reports of per-domain cookies

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_report, generate_markdown_report};
pub use stats::{evaluate_session, print_statistics, Scope, SessionStatistics};

use thiserror::Error;

/// Errors that can occur while writing output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
