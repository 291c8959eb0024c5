use crate::error::{FetchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

/// A fetched page: its body and the outbound links found on it, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub body: String,
    pub urls: Vec<String>,
}

impl Page {
    pub fn new(body: impl Into<String>, urls: Vec<String>) -> Self {
        Self {
            body: body.into(),
            urls,
        }
    }
}

/// The crawler's only external collaborator.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<Page, FetchError>;
}

/// Fetcher backed by an in-memory map of canned pages.
///
/// Every call is counted per URL, including calls for URLs the map does not
/// know, so tests can assert that nothing was fetched twice.
#[derive(Debug, Default)]
pub struct CannedFetcher {
    pages: HashMap<String, Page>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl CannedFetcher {
    pub fn new(pages: HashMap<String, Page>) -> Self {
        Self {
            pages,
            fetches: Mutex::new(HashMap::new()),
        }
    }

    /// Parse a JSON object of `{ "<url>": { "body": ..., "urls": [...] } }`.
    pub fn from_json(json: &str) -> Result<Self> {
        let pages: HashMap<String, Page> = serde_json::from_str(json)?;
        Ok(Self::new(pages))
    }

    pub fn with_page(mut self, url: impl Into<String>, body: &str, urls: &[&str]) -> Self {
        self.pages.insert(
            url.into(),
            Page::new(body, urls.iter().map(|u| u.to_string()).collect()),
        );
        self
    }

    pub fn pages(&self) -> &HashMap<String, Page> {
        &self.pages
    }

    pub async fn fetch_count(&self, url: &str) -> usize {
        self.fetches.lock().await.get(url).copied().unwrap_or(0)
    }

    pub async fn total_fetches(&self) -> usize {
        self.fetches.lock().await.values().sum()
    }

    pub async fn fetch_counts(&self) -> HashMap<String, usize> {
        self.fetches.lock().await.clone()
    }
}

#[async_trait]
impl Fetcher for CannedFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<Page, FetchError> {
        *self.fetches.lock().await.entry(url.to_string()).or_insert(0) += 1;

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::not_found(url))
    }
}

/// Fetcher that GETs pages over HTTP and pulls `a[href]` links out of HTML bodies.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("Lockstep/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_max_idle_per_host(50)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<Page, FetchError> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::not_found(url));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let is_html = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("text/html"))
            .unwrap_or(false);

        let body = response.text().await?;
        let urls = if is_html {
            extract_links(&body, url)
        } else {
            Vec::new()
        };

        Ok(Page { body, urls })
    }
}

/// Absolute, fragment-free targets of every `a[href]` in `html`, deduplicated
/// while keeping first-seen order.
pub fn extract_links(html: &str, page_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut links: Vec<String> = Vec::new();
    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href")
            && let Some(absolute) = resolve_url(page_url, href)
            && !links.contains(&absolute)
        {
            debug!("Found link: {}", absolute);
            links.push(absolute);
        }
    }
    links
}

/// Resolve `href` against `base`, dropping the fragment. Skips anchors and
/// non-navigational schemes.
pub fn resolve_url(base: &str, href: &str) -> Option<String> {
    if href.is_empty()
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with('#')
    {
        return None;
    }

    let base_url = Url::parse(base).ok()?;
    let mut resolved = base_url.join(href).ok()?;
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }
    resolved.set_fragment(None);

    Some(resolved.to_string())
}
