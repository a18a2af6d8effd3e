//! Core cache entry type shared by all caches.

use std::future::Future;

use crate::api::FetchResult;

/// Contents of a cache entry.
///
/// `NotLoaded` (never fetched, or invalidated) is distinct from a loaded
/// empty collection.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheData<T> {
  NotLoaded,
  Loaded(T),
}

impl<T> CacheData<T> {
  pub fn as_loaded(&self) -> Option<&T> {
    match self {
      CacheData::Loaded(data) => Some(data),
      CacheData::NotLoaded => None,
    }
  }

  pub fn is_loaded(&self) -> bool {
    matches!(self, CacheData::Loaded(_))
  }
}

/// A cache slot with a single-flight loading flag.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
  data: CacheData<T>,
  loading: bool,
}

impl<T> CacheEntry<T> {
  pub fn new() -> Self {
    Self {
      data: CacheData::NotLoaded,
      loading: false,
    }
  }

  pub fn data(&self) -> Option<&T> {
    self.data.as_loaded()
  }

  #[cfg(test)]
  pub fn state(&self) -> &CacheData<T> {
    &self.data
  }

  pub fn is_loaded(&self) -> bool {
    self.data.is_loaded()
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  /// Drop the cached data. The next fetch starts from scratch.
  pub fn invalidate(&mut self) {
    self.data = CacheData::NotLoaded;
  }

  /// Run `fetch` with the loading flag raised.
  ///
  /// On success `apply` folds the response into the current data. On failure
  /// the data is left exactly as it was. The flag is cleared either way.
  pub async fn load<V, Fut, A>(&mut self, fetch: Fut, apply: A) -> FetchResult<()>
  where
    Fut: Future<Output = FetchResult<V>>,
    A: FnOnce(&mut CacheData<T>, V),
  {
    self.loading = true;
    let result = fetch.await;
    self.loading = false;

    apply(&mut self.data, result?);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::FetchError;

  #[test]
  fn test_new_entry_is_not_loaded() {
    let entry: CacheEntry<Vec<u32>> = CacheEntry::new();
    assert!(!entry.is_loaded());
    assert!(!entry.is_loading());
    assert_eq!(entry.data(), None);
  }

  #[tokio::test]
  async fn test_loaded_empty_is_not_not_loaded() {
    let mut entry: CacheEntry<Vec<u32>> = CacheEntry::new();
    entry
      .load(async { Ok(Vec::new()) }, |data, v| *data = CacheData::Loaded(v))
      .await
      .unwrap();

    assert!(entry.is_loaded());
    assert_eq!(entry.data(), Some(&Vec::new()));
  }

  #[tokio::test]
  async fn test_failed_load_keeps_previous_data() {
    let mut entry: CacheEntry<Vec<u32>> = CacheEntry::new();
    entry
      .load(async { Ok(vec![1, 2]) }, |data, v| *data = CacheData::Loaded(v))
      .await
      .unwrap();

    let result = entry
      .load(
        async { Err::<Vec<u32>, _>(FetchError::Rejected("down".to_string())) },
        |data, v| *data = CacheData::Loaded(v),
      )
      .await;

    assert!(result.is_err());
    assert!(!entry.is_loading());
    assert_eq!(entry.data(), Some(&vec![1, 2]));
  }

  #[tokio::test]
  async fn test_invalidate_resets_to_not_loaded() {
    let mut entry: CacheEntry<Vec<u32>> = CacheEntry::new();
    entry
      .load(async { Ok(vec![7]) }, |data, v| *data = CacheData::Loaded(v))
      .await
      .unwrap();

    entry.invalidate();
    assert_eq!(entry.state(), &CacheData::NotLoaded);
  }
}
