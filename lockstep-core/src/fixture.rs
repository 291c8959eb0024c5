use lockstep_scanner::CannedFetcher;
use lockstep_scanner::error::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Four pages of golang.org; `/cmd/` is linked but deliberately missing.
pub const GOLANG_FIXTURE: &str = include_str!("../fixtures/golang.json");

pub const GOLANG_SEED: &str = "https://golang.org/";

pub fn golang_fetcher() -> Result<CannedFetcher> {
    CannedFetcher::from_json(GOLANG_FIXTURE)
}

/// Load a fixture graph from a JSON file. A leading `~` is expanded.
pub fn load_fixture(path: &str) -> Result<CannedFetcher> {
    let expanded = shellexpand::tilde(path);
    let path = Path::new(expanded.as_ref());
    debug!("Loading fixture from {}", path.display());

    let content = fs::read_to_string(path)?;
    CannedFetcher::from_json(&content)
}
