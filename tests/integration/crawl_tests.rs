//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use huffcrawl::config::{
    Config, CrawlerConfig, ExtractorConfig, FetcherConfig, OutputConfig, UserAgentConfig,
};
use huffcrawl::crawler::{
    crawl, CrawlDriver, CrawlSettings, DriverState, HtmlLinkFinder, HttpFetcher,
    MainTextExtractor,
};
use huffcrawl::storage::{MemoryStore, RunStatus, SqliteStore, Store};
use huffcrawl::url::DEFAULT_BLOCKED_EXTENSIONS;
use std::sync::atomic::AtomicBool;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling from `seeds`
fn create_test_config(seeds: Vec<String>, max_generation: u32, db_path: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_generation,
            seeds,
            blocked_extensions: DEFAULT_BLOCKED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        },
        fetcher: FetcherConfig {
            timeout_secs: 5,
            connect_timeout_secs: 2,
        },
        extractor: ExtractorConfig::default(),
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            database_path: db_path.to_string(),
        },
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_never_fetched(server: &MockServer, page: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html("<p>should not be fetched</p>"))
        .expect(0)
        .mount(server)
        .await;
}

fn memory_driver(
    config: &Config,
) -> CrawlDriver<HttpFetcher, MainTextExtractor, HtmlLinkFinder, MemoryStore> {
    CrawlDriver::new(
        CrawlSettings::from_config(&config.crawler),
        HttpFetcher::new(&config.user_agent, &config.fetcher).expect("client"),
        MainTextExtractor::new(&config.extractor),
        HtmlLinkFinder::new(),
        MemoryStore::new(),
    )
}

#[tokio::test]
async fn test_crawl_respects_generation_bound() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<nav><a href="/page1">One</a><a href="/page2">Two</a></nav><p>Hello Hello</p>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/page1",
        r#"<nav><a href="/deep">Deep</a><a href="/">Home</a></nav><p>First page</p>"#,
    )
    .await;
    mount_page(&mock_server, "/page2", "<p>Second page</p>").await;
    mount_never_fetched(&mock_server, "/deep").await;

    let config = create_test_config(vec![format!("{}/", base_url)], 1, ":memory:");
    let mut driver = memory_driver(&config);

    let summary = driver.run().await.expect("crawl should succeed");

    assert_eq!(driver.state(), DriverState::Done);
    assert_eq!(summary.pages_processed, 3);
    assert_eq!(summary.documents_stored, 3);
    assert!(driver.ledger().contains_url(&format!("{}/deep", base_url)));

    let store = driver.into_store();
    let seed = &store.records()[0];
    assert_eq!(seed.url, format!("{}/", base_url));
    assert_eq!(seed.compressed_text[0], 7);
    assert_eq!(seed.decode().unwrap(), "Hello Hello");

    let texts: Vec<String> = store
        .records()
        .iter()
        .map(|r| r.decode().unwrap())
        .collect();
    assert_eq!(texts, vec!["Hello Hello", "First page", "Second page"]);
}

#[tokio::test]
async fn test_blocked_links_are_not_fetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<p>Gallery</p>
        <a href="/photo.png">Photo</a>
        <a href="/archive.ZIP">Archive</a>
        <a href="ftp://example.com/file">FTP</a>
        <a href="/about">About</a>"#,
    )
    .await;
    mount_page(&mock_server, "/about", "<p>About us</p>").await;
    mount_never_fetched(&mock_server, "/photo.png").await;
    mount_never_fetched(&mock_server, "/archive.ZIP").await;

    let config = create_test_config(vec![format!("{}/", base_url)], 3, ":memory:");
    let mut driver = memory_driver(&config);

    let summary = driver.run().await.expect("crawl should succeed");

    assert_eq!(summary.pages_processed, 2);
    assert_eq!(summary.links_enqueued, 1);
}

#[tokio::test]
async fn test_identical_content_stored_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let article = "<article><p>The same story</p></article>";
    mount_page(
        &mock_server,
        "/",
        &format!(r#"<nav><a href="/mirror">Mirror</a></nav>{}"#, article),
    )
    .await;
    mount_page(&mock_server, "/mirror", article).await;

    let config = create_test_config(vec![format!("{}/", base_url)], 2, ":memory:");
    let mut driver = memory_driver(&config);

    let summary = driver.run().await.expect("crawl should succeed");

    assert_eq!(summary.pages_processed, 2);
    assert_eq!(summary.documents_stored, 1);
    assert_eq!(summary.duplicate_content, 1);
    assert_eq!(driver.store().count_documents().unwrap(), 1);
}

#[tokio::test]
async fn test_failed_fetches_are_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<nav><a href="/missing">Missing</a><a href="/data">Data</a></nav><p>Index</p>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/", base_url)], 1, ":memory:");
    let mut driver = memory_driver(&config);

    let summary = driver.run().await.expect("crawl should succeed");

    assert_eq!(summary.pages_processed, 3);
    assert_eq!(summary.fetch_failures, 2);
    assert_eq!(summary.documents_stored, 1);
}

#[tokio::test]
async fn test_crawl_records_run_and_decodable_documents() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<nav><a href="/page1">One</a></nav><main><p>Welcome to the site</p></main>"#,
    )
    .await;
    mount_page(&mock_server, "/page1", "<p>Ünïcödé text ✓</p>").await;

    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("crawl.db");
    let config = create_test_config(
        vec![format!("{}/", base_url)],
        1,
        db_path.to_str().unwrap(),
    );

    let summary = crawl(&config, "test-hash", &AtomicBool::new(false))
        .await
        .expect("crawl should succeed");
    assert_eq!(summary.documents_stored, 2);

    let store = SqliteStore::new(&db_path).unwrap();
    let run = store.get_latest_run().unwrap().expect("run recorded");
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, "test-hash");
    assert_eq!(run.pages_fetched, 2);
    assert_eq!(run.documents_stored, 2);
    assert!(run.finished_at.is_some());

    assert_eq!(
        store.list_urls().unwrap(),
        vec![format!("{}/", base_url), format!("{}/page1", base_url)]
    );
    let page = store
        .get_document(&format!("{}/page1", base_url))
        .unwrap()
        .expect("document stored");
    assert_eq!(page.decode().unwrap(), "Ünïcödé text ✓");
    assert_eq!(page.original_len, 14);
}

#[tokio::test]
async fn test_cancelled_crawl_is_marked_interrupted() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_never_fetched(&mock_server, "/").await;

    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("crawl.db");
    let config = create_test_config(
        vec![format!("{}/", base_url)],
        1,
        db_path.to_str().unwrap(),
    );

    let summary = crawl(&config, "test-hash", &AtomicBool::new(true))
        .await
        .expect("crawl should succeed");
    assert!(summary.interrupted);

    let store = SqliteStore::new(&db_path).unwrap();
    let run = store.get_latest_run().unwrap().expect("run recorded");
    assert_eq!(run.status, RunStatus::Interrupted);
    assert_eq!(store.count_documents().unwrap(), 0);
}
