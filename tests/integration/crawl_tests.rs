//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use deadlink::config::{parse_config, Config};
use deadlink::output::{CsvSink, MemorySink, ReportSink};
use deadlink::url::OriginPolicy;
use deadlink::{run_crawl, Coordinator, CrawlSummary};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no pacing and no status line
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.delay_secs = 0.0;
    config.crawler.timeout_secs = 5.0;
    config.output.progress = false;
    config
}

/// An HTML response containing the given body
fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body).into_bytes(),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, page: &str, body: &str, expected_fetches: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html_page(body))
        .expect(expected_fetches)
        .mount(server)
        .await;
}

async fn mount_head(server: &MockServer, link: &str, status: u16) {
    Mock::given(method("HEAD"))
        .and(path(link))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Answers every HEAD not matched by an earlier mock with 200
async fn mount_head_fallback(server: &MockServer) {
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

async fn crawl(config: &Config, seed: &str) -> (CrawlSummary, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let seed = Url::parse(seed).expect("Failed to parse seed URL");
    let summary = run_crawl(config, seed, sink.clone())
        .await
        .expect("Crawl failed to start");
    (summary, sink)
}

fn assert_counts_consistent(summary: &CrawlSummary) {
    assert_eq!(summary.links_checked, summary.ok + summary.broken);
}

#[tokio::test]
async fn test_self_link_with_fragment_is_not_refetched() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r##"<a href="/#section">Top</a>"##, 1).await;
    mount_head(&mock_server, "/", 200).await;

    let (summary, sink) = crawl(&create_test_config(), &mock_server.uri()).await;

    assert_eq!(summary.pages_crawled, 1);
    assert_eq!(summary.links_checked, 1);
    assert_eq!(summary.ok, 1);
    assert_eq!(summary.broken, 0);
    assert!(sink.is_empty());
    assert!(!summary.cancelled);
}

#[tokio::test]
async fn test_seed_page_load_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (summary, sink) = crawl(&create_test_config(), &mock_server.uri()).await;

    let seed = format!("{}/", mock_server.uri());
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_page, seed);
    assert_eq!(records[0].broken_link, seed);
    assert_eq!(records[0].reason, "PAGE LOAD ERROR: HTTP 404 Not Found");
    assert!(records[0].is_page_load_error());

    assert_eq!(summary.pages_crawled, 1);
    assert_eq!(summary.page_errors, 1);
    assert_eq!(summary.links_checked, 0);
    assert_eq!(summary.broken, 0);
}

#[tokio::test]
async fn test_external_links_skipped_when_not_following() {
    let mock_server = MockServer::start().await;
    let site = format!("{}/site/", mock_server.uri());

    // Under the seed-prefix policy everything outside /site/ is external
    mount_page(
        &mock_server,
        "/site/",
        r#"<a href="/elsewhere/page">Elsewhere</a>"#,
        1,
    )
    .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config();
    config.crawler.origin_policy = OriginPolicy::SeedPrefix;

    let (summary, sink) = crawl(&config, &site).await;

    assert_eq!(summary.pages_crawled, 1);
    assert_eq!(summary.links_checked, 0);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_broken_link_is_recorded_and_still_crawled() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/missing">Gone</a>"#, 1).await;
    mount_head(&mock_server, "/missing", 410).await;
    mount_page(&mock_server, "/missing", "", 1).await;

    let (summary, sink) = crawl(&create_test_config(), &mock_server.uri()).await;

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_page, format!("{}/", mock_server.uri()));
    assert_eq!(records[0].broken_link, format!("{}/missing", mock_server.uri()));
    assert_eq!(records[0].reason, "410");

    assert_eq!(summary.broken, 1);
    assert_eq!(summary.pages_crawled, 2);
    assert_counts_consistent(&summary);
}

#[tokio::test]
async fn test_internal_depth_zero_checks_but_does_not_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/child">Child</a>"#, 1).await;
    mount_head(&mock_server, "/child", 200).await;
    mount_page(&mock_server, "/child", "", 0).await;

    let mut config = create_test_config();
    config.crawler.max_internal_depth = 0;

    let (summary, _) = crawl(&config, &mock_server.uri()).await;

    assert_eq!(summary.pages_crawled, 1);
    assert_eq!(summary.links_checked, 1);
    assert_eq!(summary.ok, 1);
}

#[tokio::test]
async fn test_depth_limit_is_inclusive() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/one">1</a>"#, 1).await;
    mount_page(&mock_server, "/one", r#"<a href="/two">2</a>"#, 1).await;
    mount_page(&mock_server, "/two", r#"<a href="/three">3</a>"#, 0).await;
    mount_head_fallback(&mock_server).await;

    let mut config = create_test_config();
    config.crawler.max_internal_depth = 1;

    let (summary, _) = crawl(&config, &mock_server.uri()).await;

    assert_eq!(summary.pages_crawled, 2);
    assert_eq!(summary.links_checked, 2);
}

#[tokio::test]
async fn test_each_page_fetched_once_across_cycles() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a><a href="/a">A again</a>"#,
        1,
    )
    .await;
    mount_page(&mock_server, "/a", r#"<a href="/b">B</a><a href="/">Home</a>"#, 1).await;
    mount_page(&mock_server, "/b", r#"<a href="/a">A</a>"#, 1).await;
    mount_head_fallback(&mock_server).await;

    let (summary, sink) = crawl(&create_test_config(), &mock_server.uri()).await;

    assert_eq!(summary.pages_crawled, 3);
    // Every occurrence is checked, even repeats
    assert_eq!(summary.links_checked, 6);
    assert_eq!(summary.ok, 6);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_follow_external_respects_external_depth() {
    let mock_server = MockServer::start().await;
    let site = format!("{}/site/", mock_server.uri());

    mount_page(&mock_server, "/site/", r#"<a href="/ext/one">One</a>"#, 1).await;
    mount_page(&mock_server, "/ext/one", r#"<a href="/ext/two">Two</a>"#, 1).await;
    mount_page(&mock_server, "/ext/two", "", 0).await;
    mount_head_fallback(&mock_server).await;

    let mut config = create_test_config();
    config.crawler.origin_policy = OriginPolicy::SeedPrefix;
    config.crawler.follow_external = true;
    config.crawler.max_external_depth = 1;

    let (summary, _) = crawl(&config, &site).await;

    assert_eq!(summary.pages_crawled, 2);
    assert_eq!(summary.links_checked, 2);
}

#[tokio::test]
async fn test_non_html_page_is_not_parsed() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/report.pdf">PDF</a>"#, 1).await;
    mount_head_fallback(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            b"<a href=\"/hidden\">not a link</a>".to_vec(),
            "application/pdf",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (summary, sink) = crawl(&create_test_config(), &mock_server.uri()).await;

    assert_eq!(summary.pages_crawled, 2);
    assert_eq!(summary.page_errors, 0);
    assert_eq!(summary.links_checked, 1);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_relative_links_resolve_against_redirect_target() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/old/">Old</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/old/"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new/"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new/", r#"<a href="page">Page</a>"#, 1).await;
    mount_head(&mock_server, "/new/page", 404).await;
    mount_page(&mock_server, "/new/page", "", 1).await;
    mount_head_fallback(&mock_server).await;

    let (summary, sink) = crawl(&create_test_config(), &mock_server.uri()).await;

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_page, format!("{}/old/", mock_server.uri()));
    assert_eq!(records[0].broken_link, format!("{}/new/page", mock_server.uri()));
    assert_eq!(records[0].reason, "404");
    assert_counts_consistent(&summary);
}

#[tokio::test]
async fn test_concurrent_checks_keep_document_order() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/l0">0</a><a href="/l1">1</a><a href="/l2">2</a><a href="/l3">3</a>"#,
        1,
    )
    .await;
    // Earlier links answer later
    for (i, delay_ms) in [300u64, 0, 150, 50].iter().enumerate() {
        Mock::given(method("HEAD"))
            .and(path(format!("/l{}", i)))
            .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(*delay_ms)))
            .mount(&mock_server)
            .await;
    }

    let mut config = create_test_config();
    config.crawler.max_internal_depth = 0;
    config.crawler.max_concurrent_checks = 4;

    let (summary, sink) = crawl(&config, &mock_server.uri()).await;

    let links: Vec<String> = sink.records().into_iter().map(|r| r.broken_link).collect();
    let expected: Vec<String> = (0..4)
        .map(|i| format!("{}/l{}", mock_server.uri(), i))
        .collect();
    assert_eq!(links, expected);
    assert_eq!(summary.broken, 4);
    assert_counts_consistent(&summary);
}

#[tokio::test]
async fn test_csv_report_written_incrementally() {
    let mock_server = MockServer::start().await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let csv_path = temp_dir.path().join("report.csv");

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/ok">Fine</a><a href="/gone">Gone</a>"#,
        1,
    )
    .await;
    mount_head(&mock_server, "/gone", 404).await;
    mount_head_fallback(&mock_server).await;

    let mut config = create_test_config();
    config.crawler.max_internal_depth = 0;

    let sink = Arc::new(CsvSink::create(&csv_path).expect("Failed to create CSV"));
    let seed = Url::parse(&mock_server.uri()).unwrap();
    run_crawl(&config, seed, sink).await.unwrap();

    let content = std::fs::read_to_string(&csv_path).unwrap();
    let expected = format!(
        "Source Page,Broken Link,Error/Status\n{}/,{}/gone,404\n",
        mock_server.uri(),
        mock_server.uri()
    );
    assert_eq!(content, expected);
}

#[tokio::test]
async fn test_csv_report_has_header_with_no_broken_links() {
    let mock_server = MockServer::start().await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let csv_path = temp_dir.path().join("clean.csv");

    mount_page(&mock_server, "/", "<p>No links here</p>", 1).await;

    let sink = Arc::new(CsvSink::create(&csv_path).expect("Failed to create CSV"));
    let seed = Url::parse(&mock_server.uri()).unwrap();
    let summary = run_crawl(&create_test_config(), seed, sink).await.unwrap();

    assert_eq!(summary.total_records(), 0);
    let content = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(content, "Source Page,Broken Link,Error/Status\n");
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("").set_delay(Duration::from_secs(4)))
        .mount(&mock_server)
        .await;

    let sink = Arc::new(MemorySink::new());
    let seed = Url::parse(&mock_server.uri()).unwrap();
    let cancel = CancellationToken::new();
    let mut coordinator = Coordinator::new(&create_test_config(), seed, sink.clone())
        .unwrap()
        .with_cancellation(cancel.clone());

    let trigger = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
    });

    let start = Instant::now();
    let summary = coordinator.run().await;
    trigger.await.unwrap();

    assert!(start.elapsed() < Duration::from_secs(3));
    assert!(summary.cancelled);
    assert_eq!(summary.pages_crawled, 0);
    assert!(sink.is_empty());
    assert_eq!(summary.total_records(), sink.len() as u64);
    assert_eq!(sink.summary(), Some(summary));
}

#[tokio::test]
async fn test_cancellation_keeps_completed_checks() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/slow">Slow</a><a href="/gone">Gone</a>"#,
        1,
    )
    .await;
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;
    mount_head(&mock_server, "/gone", 404).await;

    let mut config = create_test_config();
    config.crawler.max_internal_depth = 0;
    config.crawler.max_concurrent_checks = 4;

    let sink = Arc::new(MemorySink::new());
    let seed = Url::parse(&mock_server.uri()).unwrap();
    let cancel = CancellationToken::new();
    let mut coordinator = Coordinator::new(&config, seed, sink.clone())
        .unwrap()
        .with_cancellation(cancel.clone());

    let trigger = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        cancel.cancel();
    });

    let start = Instant::now();
    let summary = coordinator.run().await;
    trigger.await.unwrap();

    // The later link finished first; its record survives the cancelled one
    assert!(start.elapsed() < Duration::from_secs(3));
    assert!(summary.cancelled);
    assert_eq!(summary.pages_crawled, 1);
    assert_eq!(summary.links_checked, 1);
    assert_eq!(summary.broken, sink.len() as u64);
    assert_eq!(summary.total_records(), sink.len() as u64);
    assert_counts_consistent(&summary);
    assert_eq!(coordinator.visited().len(), 1);

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].broken_link, format!("{}/gone", mock_server.uri()));
    assert_eq!(records[0].reason, "404");
}

#[tokio::test]
async fn test_crawl_from_config_file_settings() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/next">Next</a>"#, 1).await;
    mount_page(&mock_server, "/next", "", 0).await;
    mount_head_fallback(&mock_server).await;

    let config = parse_config(
        r#"
        [crawler]
        max-internal-depth = 0
        delay = 0.0
        timeout = 2.5

        [user-agent]
        crawler-name = "TestBot"
        crawler-version = "1.0.0"
        contact-url = "https://example.com/contact"

        [output]
        progress = false
        "#,
    )
    .expect("Failed to parse config");

    let (summary, _) = crawl(&config, &mock_server.uri()).await;

    assert_eq!(summary.pages_crawled, 1);
    assert_eq!(summary.links_checked, 1);
}

#[tokio::test]
async fn test_sink_failures_do_not_stop_the_crawl() {
    struct FailingSink;

    impl ReportSink for FailingSink {
        fn record_broken(
            &self,
            _record: &deadlink::BrokenLinkRecord,
        ) -> deadlink::output::OutputResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        }
    }

    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/gone">Gone</a><a href="/ok">Fine</a>"#,
        1,
    )
    .await;
    mount_head(&mock_server, "/gone", 404).await;
    mount_head_fallback(&mock_server).await;

    let mut config = create_test_config();
    config.crawler.max_internal_depth = 0;

    let seed = Url::parse(&mock_server.uri()).unwrap();
    let summary = run_crawl(&config, seed, Arc::new(FailingSink)).await.unwrap();

    assert_eq!(summary.links_checked, 2);
    assert_eq!(summary.broken, 1);
}
