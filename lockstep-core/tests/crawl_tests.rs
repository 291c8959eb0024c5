// Tests for crawl orchestration and reporting

use lockstep_core::crawl::{
    CrawlOptions, FetchSource, build_fetcher, execute_crawl, extract_url_path,
    generate_crawl_report,
};
use lockstep_core::fixture::{GOLANG_SEED, golang_fetcher, load_fixture};
use lockstep_scanner::{ClaimOrder, Crawler, CrawlResult};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

fn options(source: FetchSource, max_depth: usize) -> CrawlOptions {
    CrawlOptions {
        urls: vec![GOLANG_SEED.to_string()],
        max_depth,
        claim_order: ClaimOrder::BeforeDepthCheck,
        source,
        show_progress_bars: false,
    }
}

// ============================================================================
// URL Path Extraction Tests
// ============================================================================

#[test]
fn test_extract_url_path_root() {
    assert_eq!(extract_url_path("https://golang.org/"), "/");
    assert_eq!(extract_url_path("https://golang.org"), "/");
}

#[test]
fn test_extract_url_path_nested() {
    assert_eq!(extract_url_path("https://golang.org/pkg/fmt/"), "/pkg/fmt/");
}

#[test]
fn test_extract_url_path_with_query_and_fragment() {
    assert_eq!(extract_url_path("https://golang.org/pkg?x=1#top"), "/pkg");
}

#[test]
fn test_extract_url_path_not_a_url() {
    assert_eq!(extract_url_path("golang"), "golang");
}

// ============================================================================
// Golang Fixture Tests
// ============================================================================

#[tokio::test]
async fn test_golang_fixture_every_page_fetched_once() {
    let fetcher = Arc::new(golang_fetcher().unwrap());
    let crawler = Crawler::new(fetcher.clone()).with_max_depth(4);

    crawler.crawl(GOLANG_SEED).await.unwrap();

    let counts = fetcher.fetch_counts().await;
    assert_eq!(counts.len(), 5);
    assert!(counts.values().all(|&n| n == 1), "counts: {:?}", counts);
}

#[tokio::test]
async fn test_golang_fixture_depth_one_fetches_only_seed() {
    let fetcher = Arc::new(golang_fetcher().unwrap());
    let crawler = Crawler::new(fetcher.clone()).with_max_depth(1);

    let results = crawler.crawl(GOLANG_SEED).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(fetcher.total_fetches().await, 1);
    assert_eq!(crawler.visited_count().await, 3);
}

#[tokio::test]
async fn test_execute_crawl_bundled_fixture() {
    let results = execute_crawl(options(FetchSource::Bundled, 4), None)
        .await
        .unwrap();

    let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://golang.org/",
            "https://golang.org/cmd/",
            "https://golang.org/pkg/",
            "https://golang.org/pkg/fmt/",
            "https://golang.org/pkg/os/",
        ]
    );
    assert!(!results[1].is_ok());
}

#[tokio::test]
async fn test_execute_crawl_depth_zero() {
    let results = execute_crawl(options(FetchSource::Bundled, 0), None)
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_execute_crawl_reports_bad_seed_and_continues() {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let messages_clone = messages.clone();
    let callback = Arc::new(move |msg: String| {
        messages_clone.lock().unwrap().push(msg);
    });

    let mut opts = options(FetchSource::Bundled, 2);
    opts.urls = vec!["::not a url::".to_string(), GOLANG_SEED.to_string()];

    let results = execute_crawl(opts, Some(callback)).await.unwrap();

    assert_eq!(results.len(), 3);
    let messages = messages.lock().unwrap();
    assert!(messages.iter().any(|m| m.contains("Crawling seed 2/2")));
    assert!(messages.iter().any(|m| m.contains("Failed to crawl ::not a url::")));
}

#[tokio::test]
async fn test_execute_crawl_reports_claims_beyond_visits() {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let messages_clone = messages.clone();
    let callback = Arc::new(move |msg: String| {
        messages_clone.lock().unwrap().push(msg);
    });

    let results = execute_crawl(options(FetchSource::Bundled, 1), Some(callback))
        .await
        .unwrap();

    // Only the seed is fetched; its two links are claimed with no depth left.
    assert_eq!(results.len(), 1);
    let messages = messages.lock().unwrap();
    assert_eq!(
        messages.last().map(String::as_str),
        Some("Crawl complete! 1 visits, 3 URLs claimed")
    );
}

// ============================================================================
// Fixture Loading Tests
// ============================================================================

#[tokio::test]
async fn test_execute_crawl_fixture_file_with_cycle() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"{{
            "https://a.test/": {{ "body": "A", "urls": ["https://b.test/"] }},
            "https://b.test/": {{ "body": "B", "urls": ["https://a.test/"] }}
        }}"#
    )?;

    let path = file.path().to_string_lossy().to_string();
    let mut opts = options(FetchSource::Fixture(path.clone()), 10);
    opts.urls = vec!["https://a.test/".to_string()];

    let results = execute_crawl(opts, None).await?;
    assert_eq!(results.len(), 2);

    let fetcher = Arc::new(load_fixture(&path)?);
    let crawler = Crawler::new(fetcher.clone()).with_max_depth(10);
    crawler.crawl("https://a.test/").await?;
    assert_eq!(fetcher.fetch_count("https://a.test/").await, 1);
    assert_eq!(fetcher.fetch_count("https://b.test/").await, 1);

    Ok(())
}

#[test]
fn test_build_fetcher_missing_fixture_file() {
    let result = build_fetcher(&FetchSource::Fixture(
        "/definitely/not/here/fixture.json".to_string(),
    ));
    assert!(result.is_err());
}

#[test]
fn test_build_fetcher_malformed_fixture_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[1, 2, 3]").unwrap();

    let result = build_fetcher(&FetchSource::Fixture(
        file.path().to_string_lossy().to_string(),
    ));
    assert!(result.is_err());
}

// ============================================================================
// Report Tests
// ============================================================================

#[test]
fn test_generate_crawl_report() {
    let mut root = CrawlResult::new("https://golang.org/".to_string(), 4);
    root.body = Some("The Go Programming Language".to_string());
    root.links_found = vec![
        "https://golang.org/pkg/".to_string(),
        "https://golang.org/cmd/".to_string(),
    ];
    let missing = CrawlResult::with_error(
        "https://golang.org/cmd/".to_string(),
        3,
        "not found: https://golang.org/cmd/".to_string(),
    );

    let report = generate_crawl_report(&[root, missing]);

    assert!(report.contains("Pages fetched: 1"));
    assert!(report.contains("Failed fetches: 1"));
    assert!(report.contains("Total links found: 2"));
    assert!(report.contains("## golang.org"));
    assert!(report.contains("2 pages"));
    assert!(report.contains("\"The Go Programming Language\""));
    assert!(report.contains("not found: https://golang.org/cmd/"));
}

#[test]
fn test_generate_crawl_report_empty() {
    let report = generate_crawl_report(&[]);
    assert!(report.contains("Pages fetched: 0"));
    assert!(!report.contains("## "));
}
