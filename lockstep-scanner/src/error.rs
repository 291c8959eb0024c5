use thiserror::Error;

/// Failure to fetch a single page. Local to one crawl branch.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl FetchError {
    pub fn not_found(url: impl Into<String>) -> Self {
        FetchError::NotFound { url: url.into() }
    }
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Fixture error: {0}")]
    Fixture(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
