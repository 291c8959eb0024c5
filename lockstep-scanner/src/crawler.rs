use crate::error::{FetchError, Result, ScanError};
use crate::fetch::{Fetcher, Page};
use crate::result::CrawlResult;
use crate::visited::VisitedSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

/// Called with `(remaining_depth, url)` each time a visit is spawned.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Where the dedup claim sits relative to the depth check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClaimOrder {
    /// Claim first, then stop if the depth budget is spent. A URL reached with
    /// no budget left is still marked visited and will not be fetched later,
    /// even if a shorter path to it turns up.
    #[default]
    BeforeDepthCheck,
    /// Stop on a spent budget before claiming, leaving the URL free for a
    /// later discovery that still has budget.
    AfterDepthCheck,
}

/// Output of one spawned visit, handed back to the coordinator.
struct Visit {
    url: String,
    depth: usize,
    outcome: std::result::Result<Page, FetchError>,
    elapsed: Duration,
}

pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    visited: Arc<VisitedSet>,
    max_depth: usize,
    claim_order: ClaimOrder,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            visited: Arc::new(VisitedSet::new()),
            max_depth: 4,
            claim_order: ClaimOrder::default(),
            progress_callback: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_claim_order(mut self, claim_order: ClaimOrder) -> Self {
        self.claim_order = claim_order;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Share a visited set with other crawlers, or pre-seed it.
    pub fn with_visited(mut self, visited: Arc<VisitedSet>) -> Self {
        self.visited = visited;
        self
    }

    /// Crawl from `start_url`, returning once every spawned visit has finished.
    ///
    /// Each page reachable within the depth budget is fetched at most once;
    /// the visited set persists across calls on the same crawler. Fetch
    /// failures end their own branch and show up as results with `error` set.
    /// Results are in completion order.
    pub async fn crawl(&self, start_url: &str) -> Result<Vec<CrawlResult>> {
        info!(
            "Starting crawl of {} with max depth {}",
            start_url, self.max_depth
        );

        Url::parse(start_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", start_url, e)))?;

        let mut tasks: JoinSet<Visit> = JoinSet::new();
        let mut results = Vec::new();

        self.schedule(&mut tasks, start_url.to_string(), self.max_depth)
            .await;

        while let Some(joined) = tasks.join_next().await {
            let visit = joined?;

            match visit.outcome {
                Ok(page) => {
                    debug!(
                        "found: {} {:?} ({} links)",
                        visit.url,
                        page.body,
                        page.urls.len()
                    );

                    // The parent's fetch is complete before any child is claimed.
                    let child_depth = visit.depth.saturating_sub(1);
                    for link in &page.urls {
                        self.schedule(&mut tasks, link.clone(), child_depth).await;
                    }

                    let mut result = CrawlResult::new(visit.url, visit.depth);
                    result.response_time = visit.elapsed;
                    result.links_found = page.urls;
                    result.body = Some(page.body);
                    results.push(result);
                }
                Err(e) => {
                    warn!("Crawl error for {}: {}", visit.url, e);
                    let mut result =
                        CrawlResult::with_error(visit.url, visit.depth, e.to_string());
                    result.response_time = visit.elapsed;
                    results.push(result);
                }
            }
        }

        info!("Crawl complete. Fetched {} pages", results.len());
        Ok(results)
    }

    /// Claim `url` and spawn its fetch if the claim and depth budget allow.
    async fn schedule(&self, tasks: &mut JoinSet<Visit>, url: String, depth: usize) {
        match self.claim_order {
            ClaimOrder::BeforeDepthCheck => {
                if !self.visited.claim(&url).await {
                    debug!("Skipping already claimed {}", url);
                    return;
                }
                if depth == 0 {
                    debug!("Depth exhausted at {}", url);
                    return;
                }
            }
            ClaimOrder::AfterDepthCheck => {
                if depth == 0 {
                    debug!("Depth exhausted at {}", url);
                    return;
                }
                if !self.visited.claim(&url).await {
                    debug!("Skipping already claimed {}", url);
                    return;
                }
            }
        }

        if let Some(ref callback) = self.progress_callback {
            callback(depth, url.clone());
        }

        let fetcher = self.fetcher.clone();
        tasks.spawn(async move {
            let start = Instant::now();
            let outcome = fetcher.fetch(&url).await;
            Visit {
                url,
                depth,
                outcome,
                elapsed: start.elapsed(),
            }
        });
    }

    pub async fn visited(&self) -> Vec<String> {
        self.visited.snapshot().await
    }

    pub async fn visited_count(&self) -> usize {
        self.visited.len().await
    }
}
