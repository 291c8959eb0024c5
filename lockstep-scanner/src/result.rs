use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub url: String,
    /// Remaining depth budget when the page was fetched.
    pub depth: usize,
    pub body: Option<String>,
    pub response_time: Duration,
    pub links_found: Vec<String>,
    pub error: Option<String>,
}

impl CrawlResult {
    pub fn new(url: String, depth: usize) -> Self {
        Self {
            url,
            depth,
            body: None,
            response_time: Duration::from_secs(0),
            links_found: Vec::new(),
            error: None,
        }
    }

    pub fn with_error(url: String, depth: usize, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(url, depth)
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
