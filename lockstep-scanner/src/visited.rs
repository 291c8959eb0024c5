use std::collections::HashSet;
use tokio::sync::Mutex;

/// URLs claimed for visiting, shared by every task of a crawl.
///
/// The only way in is [`VisitedSet::claim`], which tests and inserts under a
/// single lock acquisition, so two tasks racing on the same URL can never both
/// win.
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `url` for visiting. Returns `true` if this call inserted it.
    pub async fn claim(&self, url: &str) -> bool {
        let mut visited = self.inner.lock().await;
        if visited.contains(url) {
            return false;
        }
        visited.insert(url.to_string())
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Sorted copy of every claimed URL.
    pub async fn snapshot(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.inner.lock().await.iter().cloned().collect();
        urls.sort();
        urls
    }
}
