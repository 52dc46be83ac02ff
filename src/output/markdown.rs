//! Markdown report generation
//!
//! This module renders the results of a session as a markdown document: run information,
//! cookie totals and one table of cookies per domain.

use crate::cookies::Cookie;
use crate::output::stats::{evaluate_session, Scope};
use crate::output::OutputResult;
use crate::session::Session;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Generates a markdown report for a session
///
/// # Arguments
///
/// * `session` - The session to report on
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn generate_markdown_report(session: &Session, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(session);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a session as markdown
pub fn format_markdown_report(session: &Session) -> String {
    let mut md = String::new();

    md.push_str("# Cookie Tracker Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", session.start.to_rfc3339()));
    if let Some(end) = session.end {
        md.push_str(&format!("- **Last Update**: {}\n", end.to_rfc3339()));
        let duration = (end - session.start).num_seconds();
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    md.push_str(&format!("- **URLs Visited**: {}\n", session.visited.len()));
    md.push_str(&format!("- **URLs Queued**: {}\n\n", session.frontier.len()));

    let stats = evaluate_session(session, &Scope::All);
    md.push_str("## Cookie Totals\n\n");
    md.push_str("| Category | Count |\n");
    md.push_str("|----------|-------|\n");
    md.push_str(&format!("| Persistent | {} |\n", stats.persistent_cookies));
    md.push_str(&format!("| Session | {} |\n", stats.session_cookies));
    md.push_str(&format!("| Tracking | {} |\n\n", stats.tracking_cookies));

    if stats.is_empty() {
        md.push_str("No cookies found.\n");
        return md;
    }

    md.push_str("## Domains\n\n");
    for (domain, result) in &session.results {
        if result.cookie_count() == 0 {
            continue;
        }

        md.push_str(&format!("### {}\n\n", domain));
        md.push_str("| Category | Name | Value | Expires |\n");
        md.push_str("|----------|------|-------|---------|\n");
        push_cookie_rows(&mut md, "Session", &result.session_cookies);
        push_cookie_rows(&mut md, "Persistent", &result.persistent_cookies);
        push_cookie_rows(&mut md, "Tracking", &result.tracking_cookies);
        md.push('\n');
    }

    md
}

fn push_cookie_rows(md: &mut String, category: &str, cookies: &BTreeMap<String, Cookie>) {
    for (name, cookie) in cookies {
        let expires = cookie
            .expires
            .map(|date| date.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "-".to_string());

        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            category,
            escape_cell(name),
            escape_cell(&cookie.value),
            expires
        ));
    }
}

/// Keeps cookie values from breaking the table layout
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
