use crate::fixture;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use lockstep_scanner::error::Result;
use lockstep_scanner::result::CrawlResult;
use lockstep_scanner::{ClaimOrder, Crawler, Fetcher, HttpFetcher, VisitedSet};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub urls: Vec<String>,
    pub max_depth: usize,
    pub claim_order: ClaimOrder,
    pub source: FetchSource,
    pub show_progress_bars: bool,
}

/// Where pages come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchSource {
    /// The bundled golang.org fixture
    Bundled,
    /// A JSON fixture file on disk
    Fixture(String),
    /// Live HTTP with a per-request timeout
    Http { timeout_secs: u64 },
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

pub fn build_fetcher(source: &FetchSource) -> Result<Arc<dyn Fetcher>> {
    let fetcher: Arc<dyn Fetcher> = match source {
        FetchSource::Bundled => Arc::new(fixture::golang_fetcher()?),
        FetchSource::Fixture(path) => Arc::new(fixture::load_fixture(path)?),
        FetchSource::Http { timeout_secs } => Arc::new(HttpFetcher::with_timeout(*timeout_secs)?),
    };
    Ok(fetcher)
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Execute a crawl with the given options.
///
/// All seeds share one crawler, so a page reached from an earlier seed is not
/// fetched again for a later one. A seed that fails to start is reported
/// through `progress_callback` and skipped.
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<Vec<CrawlResult>> {
    let CrawlOptions {
        urls,
        max_depth,
        claim_order,
        source,
        show_progress_bars,
    } = options;

    let fetcher = build_fetcher(&source)?;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let visited = Arc::new(VisitedSet::new());
    let spawned = Arc::new(AtomicUsize::new(0));
    let spawned_clone = spawned.clone();
    let pb_clone = progress_bar.clone();
    let crawler = Crawler::new(fetcher)
        .with_visited(visited.clone())
        .with_max_depth(max_depth)
        .with_claim_order(claim_order)
        .with_progress_callback(Arc::new(move |_depth: usize, url: String| {
            let count = spawned_clone.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!("Crawling... {} visits ({})", count, url));
                pb.tick();
            }
        }));

    let mut all_results = Vec::new();
    for (idx, url_str) in urls.iter().enumerate() {
        if let Some(ref callback) = progress_callback
            && urls.len() > 1
        {
            callback(format!(
                "Crawling seed {}/{}: {}",
                idx + 1,
                urls.len(),
                url_str
            ));
        }

        match crawler.crawl(url_str).await {
            Ok(results) => all_results.extend(results),
            Err(e) => {
                if let Some(ref callback) = progress_callback {
                    callback(format!("[!]  Failed to crawl {}: {}", url_str, e));
                }
            }
        }
    }

    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }
    if let Some(ref callback) = progress_callback {
        // Claims can outnumber visits: a URL reached with no depth left is
        // still claimed under the default ordering.
        callback(format!(
            "Crawl complete! {} visits, {} URLs claimed",
            spawned.load(Ordering::Relaxed),
            visited.len().await
        ));
    }

    all_results.sort_by(|a, b| a.url.cmp(&b.url));
    Ok(all_results)
}

/// Generate a crawl report from results
pub fn generate_crawl_report(results: &[CrawlResult]) -> String {
    let fetched = results.iter().filter(|r| r.is_ok()).count();
    let failed = results.len() - fetched;
    let total_links: usize = results.iter().map(|r| r.links_found.len()).sum();

    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Pages fetched: {}\n", fetched));
    report.push_str(&format!("  Failed fetches: {}\n", failed));
    report.push_str(&format!("  Total links found: {}\n", total_links));
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    // Group by host, sorted so the report is stable across runs
    let mut by_host: BTreeMap<String, Vec<&CrawlResult>> = BTreeMap::new();
    for result in results {
        let host = Url::parse(&result.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string());
        by_host.entry(host).or_default().push(result);
    }

    for (host, mut host_results) in by_host {
        host_results.sort_by(|a, b| a.url.cmp(&b.url));

        report.push_str(&format!("## {}\n", host));
        report.push_str(&format!("  {} pages\n\n", host_results.len()));

        for result in host_results {
            let path = extract_url_path(&result.url);
            let line = match (&result.error, &result.body) {
                (Some(error), _) => format!("  {} {} {}", "✗".red(), path, error.dimmed()),
                (None, Some(body)) => format!("  {} {} {:?}", "✓".green(), path, body),
                (None, None) => format!("  {} {}", "✓".green(), path),
            };
            report.push_str(&line);
            report.push('\n');
        }
        report.push('\n');
    }

    report
}
