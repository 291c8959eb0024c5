pub mod crawler;
pub mod error;
pub mod fetch;
pub mod result;
pub mod visited;

pub use crawler::{ClaimOrder, Crawler, ProgressCallback};
pub use error::{FetchError, ScanError};
pub use fetch::{CannedFetcher, Fetcher, HttpFetcher, Page};
pub use result::CrawlResult;
pub use visited::VisitedSet;
