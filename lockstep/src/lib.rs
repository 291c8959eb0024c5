pub mod commands;
pub mod handlers;

// Re-export crawl functionality from lockstep-core
pub use lockstep_core::crawl::{
    CrawlOptions, CrawlProgressCallback, FetchSource, execute_crawl, extract_url_path,
    generate_crawl_report,
};
