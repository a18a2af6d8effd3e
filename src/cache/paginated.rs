use tracing::debug;

use super::entry::{CacheData, CacheEntry};
use crate::api::{DataSource, FetchResult, PageToken, PaginatedResult, Transaction};

/// All transactions, accumulated page by page
#[derive(Debug, Clone)]
pub struct PaginatedTransactionCache {
  entry: CacheEntry<PaginatedResult<Transaction>>,
}

impl PaginatedTransactionCache {
  pub fn new() -> Self {
    Self {
      entry: CacheEntry::new(),
    }
  }

  /// Every row fetched so far, in page order
  pub fn transactions(&self) -> Option<&[Transaction]> {
    self.entry.data().map(|result| result.data.as_slice())
  }

  pub fn next_page(&self) -> Option<&PageToken> {
    self.entry.data().and_then(|result| result.next_page.as_ref())
  }

  /// Loaded and the source reported no further pages
  pub fn is_exhausted(&self) -> bool {
    matches!(self.entry.data(), Some(result) if result.next_page.is_none())
  }

  pub fn is_loaded(&self) -> bool {
    self.entry.is_loaded()
  }

  #[cfg(test)]
  pub fn is_loading(&self) -> bool {
    self.entry.is_loading()
  }

  /// Fetch the page after the last known cursor and append it.
  ///
  /// Starts at the first page when nothing is cached. Once exhausted this is
  /// a no-op. Returns how many rows were appended.
  pub async fn fetch_all<S: DataSource>(&mut self, source: &S) -> FetchResult<usize> {
    if self.is_exhausted() {
      debug!("transaction pages exhausted, skipping fetch");
      return Ok(0);
    }

    let page = self.next_page().cloned();
    let mut appended = 0;

    self
      .entry
      .load(source.transactions_page(page.as_ref()), |data, response| {
        appended = response.data.len();
        debug!(
          page = ?page,
          rows = appended,
          next = ?response.next_page,
          "transaction page loaded"
        );
        match data {
          CacheData::Loaded(accumulated) => {
            accumulated.data.extend(response.data);
            accumulated.next_page = response.next_page;
          }
          CacheData::NotLoaded => *data = CacheData::Loaded(response),
        }
      })
      .await?;

    Ok(appended)
  }

  /// Drop all pages. The next fetch restarts at page 1.
  pub fn invalidate_data(&mut self) {
    self.entry.invalidate();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::testing::{transaction, Call, ScriptedSource};

  fn three_pages() -> ScriptedSource {
    ScriptedSource::new()
      .with_page(None, vec![transaction("t1", "e1"), transaction("t2", "e1")], Some("p2"))
      .with_page(Some("p2"), vec![transaction("t3", "e2")], Some("p3"))
      .with_page(Some("p3"), vec![transaction("t4", "e2")], None)
  }

  fn ids(cache: &PaginatedTransactionCache) -> Vec<String> {
    cache
      .transactions()
      .unwrap_or_default()
      .iter()
      .map(|t| t.id.clone())
      .collect()
  }

  #[tokio::test]
  async fn test_fetch_all_appends_pages() {
    let source = three_pages();
    let mut cache = PaginatedTransactionCache::new();

    assert_eq!(cache.fetch_all(&source).await.unwrap(), 2);
    assert_eq!(cache.next_page(), Some(&PageToken::new("p2")));

    assert_eq!(cache.fetch_all(&source).await.unwrap(), 1);
    assert_eq!(ids(&cache), vec!["t1", "t2", "t3"]);
    assert_eq!(cache.next_page(), Some(&PageToken::new("p3")));
  }

  #[tokio::test]
  async fn test_exhausted_fetch_is_noop() {
    let source = three_pages();
    let mut cache = PaginatedTransactionCache::new();

    for _ in 0..3 {
      cache.fetch_all(&source).await.unwrap();
    }
    assert!(cache.is_exhausted());
    source.clear_calls();

    assert_eq!(cache.fetch_all(&source).await.unwrap(), 0);
    assert!(source.calls().is_empty());
    assert_eq!(ids(&cache), vec!["t1", "t2", "t3", "t4"]);
  }

  #[tokio::test]
  async fn test_invalidate_restarts_from_first_page() {
    let source = three_pages();
    let mut cache = PaginatedTransactionCache::new();

    cache.fetch_all(&source).await.unwrap();
    cache.fetch_all(&source).await.unwrap();
    cache.invalidate_data();
    assert!(!cache.is_loaded());

    source.clear_calls();
    cache.fetch_all(&source).await.unwrap();
    assert_eq!(source.calls(), vec![Call::Page(None)]);
    assert_eq!(ids(&cache), vec!["t1", "t2"]);
  }

  #[tokio::test]
  async fn test_failed_page_keeps_accumulated_rows() {
    let source = three_pages();
    let mut cache = PaginatedTransactionCache::new();
    cache.fetch_all(&source).await.unwrap();

    source.fail_pages(true);
    assert!(cache.fetch_all(&source).await.is_err());
    assert!(!cache.is_loading());
    assert_eq!(ids(&cache), vec!["t1", "t2"]);
    assert_eq!(cache.next_page(), Some(&PageToken::new("p2")));
  }

  #[tokio::test]
  async fn test_empty_first_page_is_loaded() {
    let source = ScriptedSource::new().with_page(None, Vec::new(), None);
    let mut cache = PaginatedTransactionCache::new();

    assert_eq!(cache.fetch_all(&source).await.unwrap(), 0);
    assert!(cache.is_loaded());
    assert_eq!(cache.transactions(), Some(&[][..]));
  }
}
