//! Data sources for employees and transactions.
//!
//! Everything the controller knows about the outside world goes through the
//! [`DataSource`] trait. The binary picks either the HTTP client or the
//! in-memory fixture at startup via [`Source`].

pub mod api_types;
pub mod client;
pub mod fixture;
#[cfg(test)]
pub mod testing;
pub mod types;

use std::future::Future;

pub use client::HttpSource;
pub use fixture::FixtureSource;
pub use types::{Employee, PageToken, PaginatedResult, Transaction};

/// Failure while talking to a data source. Never retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
  #[error("request to {endpoint} failed: {source}")]
  Transport {
    endpoint: String,
    #[source]
    source: reqwest::Error,
  },
  #[error("{endpoint} returned HTTP {status}")]
  Status { endpoint: String, status: u16 },
  #[error("failed to decode {endpoint} response: {source}")]
  Decode {
    endpoint: String,
    #[source]
    source: serde_json::Error,
  },
  #[error("{0}")]
  Rejected(String),
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Remote contract for the three transaction-view data sets.
pub trait DataSource: Send + Sync + 'static {
  /// All employees in the directory
  fn employees(&self) -> impl Future<Output = FetchResult<Vec<Employee>>> + Send;

  /// One page of all transactions. `None` requests the first page.
  fn transactions_page(
    &self,
    page: Option<&PageToken>,
  ) -> impl Future<Output = FetchResult<PaginatedResult<Transaction>>> + Send;

  /// Every transaction for one employee, unpaginated
  fn transactions_by_employee(
    &self,
    employee_id: &str,
  ) -> impl Future<Output = FetchResult<Vec<Transaction>>> + Send;

  /// Persist an approval decision
  fn set_transaction_approval(
    &self,
    transaction_id: &str,
    approved: bool,
  ) -> impl Future<Output = FetchResult<()>> + Send;
}

/// Source selected from configuration
#[derive(Clone)]
pub enum Source {
  Http(HttpSource),
  Fixture(FixtureSource),
}

impl Source {
  /// Short label for the header bar
  pub fn describe(&self) -> String {
    match self {
      Source::Http(http) => http.base_url().to_string(),
      Source::Fixture(fixture) => fixture.label().to_string(),
    }
  }
}

impl DataSource for Source {
  async fn employees(&self) -> FetchResult<Vec<Employee>> {
    match self {
      Source::Http(s) => s.employees().await,
      Source::Fixture(s) => s.employees().await,
    }
  }

  async fn transactions_page(
    &self,
    page: Option<&PageToken>,
  ) -> FetchResult<PaginatedResult<Transaction>> {
    match self {
      Source::Http(s) => s.transactions_page(page).await,
      Source::Fixture(s) => s.transactions_page(page).await,
    }
  }

  async fn transactions_by_employee(&self, employee_id: &str) -> FetchResult<Vec<Transaction>> {
    match self {
      Source::Http(s) => s.transactions_by_employee(employee_id).await,
      Source::Fixture(s) => s.transactions_by_employee(employee_id).await,
    }
  }

  async fn set_transaction_approval(&self, transaction_id: &str, approved: bool) -> FetchResult<()> {
    match self {
      Source::Http(s) => s.set_transaction_approval(transaction_id, approved).await,
      Source::Fixture(s) => s.set_transaction_approval(transaction_id, approved).await,
    }
  }
}
