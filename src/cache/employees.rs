use tracing::debug;

use super::entry::{CacheData, CacheEntry};
use crate::api::{DataSource, Employee, FetchResult};

/// Employee directory, fetched once and kept until invalidated
#[derive(Debug, Clone)]
pub struct EmployeeCache {
  entry: CacheEntry<Vec<Employee>>,
}

impl EmployeeCache {
  pub fn new() -> Self {
    Self {
      entry: CacheEntry::new(),
    }
  }

  /// Loaded employees, `None` until the first successful fetch
  pub fn employees(&self) -> Option<&[Employee]> {
    self.entry.data().map(Vec::as_slice)
  }

  #[cfg(test)]
  pub fn state(&self) -> &CacheData<Vec<Employee>> {
    self.entry.state()
  }

  pub fn is_loaded(&self) -> bool {
    self.entry.is_loaded()
  }

  pub fn is_loading(&self) -> bool {
    self.entry.is_loading()
  }

  /// Fetch the directory unless it is already cached
  pub async fn fetch_all<S: DataSource>(&mut self, source: &S) -> FetchResult<&[Employee]> {
    if self.entry.is_loaded() {
      debug!("employee directory already cached");
    } else {
      self
        .entry
        .load(source.employees(), |data, employees| {
          debug!(count = employees.len(), "employee directory loaded");
          *data = CacheData::Loaded(employees);
        })
        .await?;
    }
    Ok(self.employees().unwrap_or_default())
  }

  pub fn invalidate_data(&mut self) {
    self.entry.invalidate();
  }
}
