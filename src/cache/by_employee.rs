use tracing::debug;

use super::entry::{CacheData, CacheEntry};
use crate::api::{DataSource, FetchResult, Transaction};

/// Transactions for one employee, tagged with the employee they belong to
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeTransactions {
  pub employee_id: String,
  pub transactions: Vec<Transaction>,
}

/// Employee-scoped transactions. Unpaginated, replaced on every fetch.
#[derive(Debug, Clone)]
pub struct EmployeeTransactionCache {
  entry: CacheEntry<EmployeeTransactions>,
}

impl EmployeeTransactionCache {
  pub fn new() -> Self {
    Self {
      entry: CacheEntry::new(),
    }
  }

  #[cfg(test)]
  pub fn data(&self) -> Option<&EmployeeTransactions> {
    self.entry.data()
  }

  /// Cached rows, only if they were fetched for `employee_id`
  pub fn transactions_for(&self, employee_id: &str) -> Option<&[Transaction]> {
    self
      .entry
      .data()
      .filter(|cached| cached.employee_id == employee_id)
      .map(|cached| cached.transactions.as_slice())
  }

  pub fn is_loaded(&self) -> bool {
    self.entry.is_loaded()
  }

  #[cfg(test)]
  pub fn is_loading(&self) -> bool {
    self.entry.is_loading()
  }

  pub async fn fetch_by_id<S: DataSource>(
    &mut self,
    source: &S,
    employee_id: &str,
  ) -> FetchResult<&[Transaction]> {
    self
      .entry
      .load(
        source.transactions_by_employee(employee_id),
        |data, transactions| {
          debug!(employee_id, count = transactions.len(), "employee transactions loaded");
          *data = CacheData::Loaded(EmployeeTransactions {
            employee_id: employee_id.to_string(),
            transactions,
          });
        },
      )
      .await?;

    Ok(self.transactions_for(employee_id).unwrap_or_default())
  }

  pub fn invalidate_data(&mut self) {
    self.entry.invalidate();
  }
}
