//! Settings module for Cookie Tracker
//!
//! This module handles loading, parsing, validating and saving the line-oriented
//! settings file.
//!
//! # Example
//!
//! ```no_run
//! use cookie_tracker::config::load_settings;
//! use std::path::Path;
//!
//! let settings = load_settings(Path::new("settings.conf")).unwrap();
//! println!("Crawl mode: {:?}", settings.mode);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CrawlMode, PrivacyHeader, Settings, UserAgent};

// Re-export parser functions
pub use parser::{load_settings, parse_settings, save_settings};
pub use validation::validate;
