//! Cookie Tracker main entry point
//!
//! This is the command-line interface for the Cookie Tracker crawler.

use anyhow::{bail, Context};
use clap::Parser;
use cookie_tracker::config::{load_settings, Settings};
use cookie_tracker::crawler::{event_channel, CrawlEvent, CrawlStatus, Crawler, Fetcher};
use cookie_tracker::output::{evaluate_session, generate_markdown_report, print_statistics, Scope};
use cookie_tracker::session::{continue_session, create_session, save_session, Session};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Session file used when neither --save nor --session is given
const DEFAULT_SESSION_FILE: &str = "session.json";

/// Cookie Tracker: find cookies that only appear when privacy is requested
///
/// Cookie Tracker crawls websites, fetching every page twice: once plain and once with a
/// Do-Not-Track or Global-Privacy-Control header. Cookies set only on the second request are
/// reported as tracking cookies.
#[derive(Parser, Debug)]
#[command(name = "cookie-tracker")]
#[command(version = "1.0.0")]
#[command(about = "A privacy-signal cookie crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from, or to add to a resumed session
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Resume the session stored in this JSON file
    #[arg(long, value_name = "FILE")]
    session: Option<PathBuf>,

    /// Path to the settings file (USER-AGENT, HEADER, MODE)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Where to write the session when the crawl ends
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Write a markdown report of the results to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Print cookie statistics when the crawl ends
    #[arg(long)]
    stats: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout: u64,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let settings = match &cli.settings {
        Some(path) => {
            tracing::info!("Loading settings from: {}", path.display());
            load_settings(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?
        }
        None => Settings::default(),
    };
    tracing::info!(
        "Header: {:?}, mode: {:?}, user agent: {:?}",
        settings.header,
        settings.mode,
        settings.user_agent
    );

    let session = open_session(cli.url.as_deref(), cli.session.as_deref())?;

    let fetcher = Fetcher::with_timeout(&settings, Duration::from_secs(cli.timeout))
        .context("Failed to build HTTP client")?;
    let (tx, mut rx) = event_channel();
    let crawler = Crawler::with_fetcher(settings, fetcher).with_events(tx);

    // Ctrl-C requests a graceful stop after the current page
    let abort = crawler.abort_handle();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if abort.abort() {
                tracing::warn!("Interrupt received, finishing current page");
            }
        }
    });

    let quiet = cli.quiet;
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if quiet {
                continue;
            }
            match event {
                CrawlEvent::Started { frontier } => {
                    println!("Crawl started, {} URLs queued", frontier);
                }
                CrawlEvent::Visited {
                    url,
                    domain,
                    visited,
                } => {
                    println!("[{}] {} ({})", visited, url, domain);
                }
                CrawlEvent::Finished { status, session } => {
                    println!(
                        "Crawl finished ({:?}): {} URLs visited, {} domains",
                        status,
                        session.visited.len(),
                        session.results.len()
                    );
                }
            }
        }
    });

    let report = crawler.crawl(session).await;
    // Dropping the crawler closes the event channel so the printer can drain and exit
    drop(crawler);
    let _ = printer.await;

    if report.status == CrawlStatus::Aborted {
        tracing::warn!("Crawl aborted, {} URLs left", report.session.frontier.len());
    }

    let save_path = cli
        .save
        .or(cli.session)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
    save_session(&save_path, &report.session)
        .with_context(|| format!("Failed to save session to {}", save_path.display()))?;
    tracing::info!("Session saved to: {}", save_path.display());

    if let Some(path) = &cli.report {
        generate_markdown_report(&report.session, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Report written to: {}", path.display());
    }

    if cli.stats {
        let stats = evaluate_session(&report.session, &Scope::All);
        print_statistics(&report.session, &stats);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("cookie_tracker=info,warn"),
            1 => EnvFilter::new("cookie_tracker=debug,info"),
            2 => EnvFilter::new("cookie_tracker=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Creates a new session from the URL or resumes the given session file
fn open_session(url: Option<&str>, session_file: Option<&Path>) -> anyhow::Result<Session> {
    match (session_file, url) {
        (Some(path), url) => {
            tracing::info!("Resuming session from: {}", path.display());
            let serialized = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read session file {}", path.display()))?;
            Ok(continue_session(url, &serialized)?)
        }
        (None, Some(url)) => Ok(create_session(url)?),
        (None, None) => bail!("Either a start URL or --session FILE is required"),
    }
}
