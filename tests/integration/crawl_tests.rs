//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch, compare and aggregate cycle end-to-end.

use cookie_tracker::config::{CrawlMode, PrivacyHeader, Settings};
use cookie_tracker::crawler::{event_channel, CrawlEvent, CrawlStatus, Crawler, DocumentExtractor};
use cookie_tracker::session::{continue_session, load_session, save_session, Session};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

const HOST: &str = "127.0.0.1";

/// Matches requests that do not carry the given header
struct WithoutHeader(&'static str);

impl Match for WithoutHeader {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key(self.0)
    }
}

fn html_page(links: &[String]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|link| format!(r#"<a href="{}">link</a>"#, link))
        .collect();

    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", anchors))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page: &str, links: &[String]) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html_page(links))
        .mount(server)
        .await;
}

async fn run(settings: Settings, session: Session) -> (CrawlStatus, Session) {
    let crawler = Crawler::new(settings).expect("Failed to build crawler");
    let report = crawler.crawl(session).await;
    (report.status, report.session)
}

#[tokio::test]
async fn test_dnt_tracking_cookie_detected() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(WithoutHeader("dnt"))
        .respond_with(html_page(&[]).insert_header("set-cookie", "sid=1"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("dnt", "1"))
        .respond_with(html_page(&[]).insert_header(
            "set-cookie",
            "sid=1, tid=2; Expires=Wed, 21 Oct 2099 07:28:00 GMT",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let seed = format!("{}/", base_url);
    let (status, session) = run(Settings::default(), Session::new(seed.clone())).await;

    assert_eq!(status, CrawlStatus::Completed);
    assert!(session.visited.contains(&seed));
    assert!(session.frontier.is_empty());
    assert!(session.end.is_some());

    let result = session.results.get(HOST).expect("No result for host");
    assert_eq!(
        result.session_cookies.keys().collect::<Vec<_>>(),
        vec!["sid"]
    );
    assert!(result.persistent_cookies.is_empty());
    assert_eq!(
        result.tracking_cookies.keys().collect::<Vec<_>>(),
        vec!["tid"]
    );
    assert_eq!(result.tracking_cookies["tid"].value, "2");
    assert!(result.tracking_cookies["tid"].expires.is_some());
}

#[tokio::test]
async fn test_gpc_header_sent() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(WithoutHeader("sec-gpc"))
        .respond_with(html_page(&[]).insert_header("set-cookie", "pref=a; Max-Age=3600"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("sec-gpc", "1"))
        .respond_with(html_page(&[]).insert_header("set-cookie", "pref=a; Max-Age=3600, gpc=1"))
        .expect(1)
        .mount(&server)
        .await;

    let settings = Settings {
        header: PrivacyHeader::Gpc,
        ..Settings::default()
    };
    let (_, session) = run(settings, Session::new(format!("{}/", base_url))).await;

    let result = &session.results[HOST];
    assert_eq!(
        result.persistent_cookies.keys().collect::<Vec<_>>(),
        vec!["pref"]
    );
    assert!(result.session_cookies.is_empty());
    assert_eq!(
        result.tracking_cookies.keys().collect::<Vec<_>>(),
        vec!["gpc"]
    );
}

#[tokio::test]
async fn test_no_tracking_when_cookies_match() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&[]).insert_header("set-cookie", "sid=1"))
        .expect(2)
        .mount(&server)
        .await;

    let (_, session) = run(Settings::default(), Session::new(format!("{}/", base_url))).await;

    let result = &session.results[HOST];
    assert_eq!(result.session_cookies.len(), 1);
    assert!(result.tracking_cookies.is_empty());
}

#[tokio::test]
async fn test_redirect_followed() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(html_page(&[]).insert_header("set-cookie", "sid=1"))
        .expect(2)
        .mount(&server)
        .await;

    let old = format!("{}/old", base_url);
    let new = format!("{}/new", base_url);
    let (status, session) = run(Settings::default(), Session::new(old.clone())).await;

    assert_eq!(status, CrawlStatus::Completed);
    assert!(session.visited.contains(&old));
    assert!(session.visited.contains(&new));
    assert!(session.results[HOST].session_cookies.contains_key("sid"));
}

#[tokio::test]
async fn test_redirect_loop_abandoned() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    // The first request plus five followed redirects
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
        .expect(6)
        .mount(&server)
        .await;

    let seed = format!("{}/loop", base_url);
    let (status, session) = run(Settings::default(), Session::new(seed.clone())).await;

    assert_eq!(status, CrawlStatus::Completed);
    assert_eq!(session.visited.as_slice(), &[seed]);
    assert!(session.results.is_empty());
    assert!(session.frontier.is_empty());
}

#[tokio::test]
async fn test_privacy_redirect_cycle_abandoned() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/p"))
        .and(WithoutHeader("dnt"))
        .respond_with(html_page(&[]).insert_header("set-cookie", "sid=1"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/p"))
        .and(header("dnt", "1"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/q"))
        .expect(1)
        .mount(&server)
        .await;

    // Back to /p, which is already part of the chain
    Mock::given(method("GET"))
        .and(path("/q"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/p"))
        .expect(1)
        .mount(&server)
        .await;

    let p = format!("{}/p", base_url);
    let q = format!("{}/q", base_url);
    let (status, session) = run(Settings::default(), Session::new(p.clone())).await;

    assert_eq!(status, CrawlStatus::Completed);
    assert_eq!(session.visited.as_slice(), &[p, q]);
    assert!(session.results.is_empty());
    assert!(session.frontier.is_empty());
}

#[tokio::test]
async fn test_failed_url_skipped() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html_page(&[]).insert_header("set-cookie", "sid=1"))
        .expect(2)
        .mount(&server)
        .await;

    let broken = format!("{}/broken", base_url);
    let ok = format!("{}/ok", base_url);
    let mut session = Session::new(ok.clone());
    session.frontier.push_external(&broken);

    let (status, session) = run(Settings::default(), session).await;

    assert_eq!(status, CrawlStatus::Completed);
    assert_eq!(session.visited.as_slice(), &[broken, ok]);
    assert_eq!(session.results.len(), 1);
}

#[tokio::test]
async fn test_internal_links_explored_without_externals() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    let a = format!("{}/a", base_url);
    let b = format!("{}/b", base_url);
    let root = format!("{}/", base_url);

    mount_page(&server, "/", &[a.clone(), b.clone()]).await;
    mount_page(&server, "/a", &[root.clone()]).await;
    mount_page(&server, "/b", &[a.clone()]).await;

    let (status, session) = run(Settings::default(), Session::new(root.clone())).await;

    assert_eq!(status, CrawlStatus::Completed);
    assert_eq!(session.visited.len(), 3);
    assert!(session.visited.contains(&a));
    assert!(session.visited.contains(&b));
    assert!(session.frontier.is_empty());
    assert!(session.results.contains_key(HOST));
}

#[tokio::test]
async fn test_external_links_take_priority() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;
    let base_url = server.uri();

    // A different host name, so these count as external links
    let other_port = other.address().port();
    let x = format!("http://localhost:{}/x", other_port);
    let y = format!("http://localhost:{}/y", other_port);
    let internal = format!("{}/internal", base_url);

    mount_page(&server, "/", &[internal.clone(), x.clone(), y.clone()]).await;
    Mock::given(method("GET"))
        .and(path("/internal"))
        .respond_with(html_page(&[]))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&other, "/x", &[]).await;
    mount_page(&other, "/y", &[]).await;

    let root = format!("{}/", base_url);
    let (status, session) = run(Settings::default(), Session::new(root.clone())).await;

    assert_eq!(status, CrawlStatus::Completed);
    assert_eq!(session.visited.as_slice(), &[root, y, x]);
    assert!(!session.visited.contains(&internal));
    assert!(session.results.contains_key("localhost"));
}

#[tokio::test]
async fn test_single_page_mode() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    let a = format!("{}/a", base_url);
    mount_page(&server, "/", &[a.clone()]).await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page(&[]))
        .expect(0)
        .mount(&server)
        .await;

    let settings = Settings {
        mode: CrawlMode::SinglePage,
        ..Settings::default()
    };
    let (status, session) = run(settings, Session::new(format!("{}/", base_url))).await;

    assert_eq!(status, CrawlStatus::SinglePage);
    assert_eq!(session.visited.len(), 1);
    assert!(session.results.contains_key(HOST));
}

#[tokio::test]
async fn test_abort_stops_after_current_page() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    let a = format!("{}/a", base_url);
    let b = format!("{}/b", base_url);

    Mock::given(method("GET"))
        .and(path("/"))
        .and(WithoutHeader("dnt"))
        .respond_with(html_page(&[a.clone(), b.clone()]))
        .mount(&server)
        .await;

    // Slow privacy fetch so the abort lands while the page is still in progress
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("dnt", "1"))
        .respond_with(
            html_page(&[])
                .insert_header("set-cookie", "sid=1")
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page(&[]))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page(&[]))
        .expect(0)
        .mount(&server)
        .await;

    let (tx, mut rx) = event_channel();
    let crawler = Crawler::new(Settings::default())
        .expect("Failed to build crawler")
        .with_events(tx);
    let abort = crawler.abort_handle();

    let listener = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let CrawlEvent::Visited { .. } = event {
                assert!(abort.abort());
            }
        }
    });

    let report = crawler.crawl(Session::new(format!("{}/", base_url))).await;
    drop(crawler);
    listener.await.expect("Listener panicked");

    assert_eq!(report.status, CrawlStatus::Aborted);
    assert_eq!(report.session.visited.len(), 1);
    // The page in progress was finished before stopping
    assert!(report.session.results[HOST].session_cookies.is_empty());
    assert_eq!(report.session.results[HOST].tracking_cookies.len(), 1);
    assert!(report.session.frontier.external().is_empty());
    assert_eq!(report.session.frontier.internal(), &[a, b]);
}

#[tokio::test]
async fn test_resume_saved_session() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file = dir.path().join("session.json");

    let done = format!("{}/done", base_url);
    let next = format!("{}/next", base_url);
    let added = format!("{}/added", base_url);

    Mock::given(method("GET"))
        .and(path("/done"))
        .respond_with(html_page(&[]))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, "/next", &[done.clone()]).await;
    Mock::given(method("GET"))
        .and(path("/added"))
        .respond_with(html_page(&[]).insert_header("set-cookie", "sid=1"))
        .mount(&server)
        .await;

    // A session interrupted after /done with /next still queued
    let mut previous = Session::new(done.clone());
    previous.mark_visited(&done);
    previous.frontier.push_external(&next);
    previous.touch();
    save_session(&file, &previous).expect("Failed to save session");

    let serialized = std::fs::read_to_string(&file).expect("Failed to read session");
    let resumed = continue_session(Some(&added), &serialized).expect("Failed to resume");
    assert_eq!(resumed.frontier.external(), &[next.clone(), added.clone()]);

    let (status, session) = run(Settings::default(), resumed).await;
    assert_eq!(status, CrawlStatus::Completed);
    assert_eq!(session.visited.as_slice(), &[done, added, next]);

    save_session(&file, &session).expect("Failed to save session");
    let reloaded = load_session(&file).expect("Failed to load session");
    assert_eq!(reloaded, session);
    assert!(reloaded.results[HOST].session_cookies.contains_key("sid"));
}

#[tokio::test]
async fn test_invalid_session_replaced_by_url() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    mount_page(&server, "/", &[]).await;

    let seed = format!("{}/", base_url);
    let session =
        continue_session(Some(&seed), r#"{"start": "x"}"#).expect("Failed to start new session");
    assert_eq!(session.frontier.external(), &[seed.clone()]);

    let (_, session) = run(Settings::default(), session).await;
    assert_eq!(session.visited.as_slice(), &[seed]);
}

#[tokio::test]
async fn test_document_extractor_follows_single_quoted_links() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    let root = format!("{}/", base_url);
    let deep = format!("{}/deep", base_url);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(
                    "<html><body><a href='{}'>single quoted</a></body></html>",
                    deep
                ))
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/deep"))
        .respond_with(html_page(&[]).insert_header("set-cookie", "sid=1"))
        .expect(2)
        .mount(&server)
        .await;

    let crawler = Crawler::new(Settings::default())
        .expect("Failed to build crawler")
        .with_extractor(DocumentExtractor);
    let report = crawler.crawl(Session::new(root.clone())).await;

    assert_eq!(report.status, CrawlStatus::Completed);
    assert_eq!(report.session.visited.as_slice(), &[root, deep]);
    assert!(report.session.results[HOST].session_cookies.contains_key("sid"));
}
