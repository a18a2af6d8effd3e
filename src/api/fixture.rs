//! In-memory data source backed by a JSON dataset.
//!
//! Serves the same contract as the HTTP API: numeric page tokens, pages of
//! `page_size` rows, and optional artificial latency so loading states are
//! visible in the UI.

use crate::api::api_types::ApiDataset;
use crate::api::types::{Employee, PageToken, PaginatedResult, Transaction};
use crate::api::{DataSource, FetchError, FetchResult};
use color_eyre::{eyre::eyre, Result};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

const SAMPLE_DATASET: &str = include_str!("sample.json");

pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug)]
struct FixtureData {
  employees: Vec<Employee>,
  transactions: Mutex<Vec<Transaction>>,
}

/// Fixture dataset shared between clones
#[derive(Clone, Debug)]
pub struct FixtureSource {
  data: Arc<FixtureData>,
  page_size: usize,
  latency: Duration,
  label: String,
}

impl FixtureSource {
  /// Built-in demo dataset
  pub fn sample() -> Result<Self> {
    Self::from_json(SAMPLE_DATASET, "sample data")
  }

  /// Load a dataset file
  pub fn load(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read fixture {}: {}", path.display(), e))?;
    Self::from_json(&contents, &path.display().to_string())
  }

  pub fn from_json(json: &str, label: &str) -> Result<Self> {
    let dataset: ApiDataset =
      serde_json::from_str(json).map_err(|e| eyre!("Failed to parse fixture {}: {}", label, e))?;

    Ok(Self {
      data: Arc::new(FixtureData {
        employees: dataset.employees.into_iter().map(Employee::from).collect(),
        transactions: Mutex::new(
          dataset
            .transactions
            .into_iter()
            .map(Transaction::from)
            .collect(),
        ),
      }),
      page_size: DEFAULT_PAGE_SIZE,
      latency: Duration::ZERO,
      label: label.to_string(),
    })
  }

  pub fn with_page_size(mut self, page_size: usize) -> Self {
    self.page_size = page_size.max(1);
    self
  }

  pub fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = latency;
    self
  }

  pub fn label(&self) -> &str {
    &self.label
  }

  async fn simulate_latency(&self) {
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
  }

  fn transactions(&self) -> FetchResult<std::sync::MutexGuard<'_, Vec<Transaction>>> {
    self
      .data
      .transactions
      .lock()
      .map_err(|e| FetchError::Rejected(format!("Fixture lock poisoned: {}", e)))
  }

  fn page_index(page: Option<&PageToken>) -> FetchResult<usize> {
    match page {
      None => Ok(0),
      Some(token) => token
        .as_str()
        .parse()
        .map_err(|_| FetchError::Rejected(format!("Unknown page token {}", token))),
    }
  }
}

impl DataSource for FixtureSource {
  async fn employees(&self) -> FetchResult<Vec<Employee>> {
    self.simulate_latency().await;
    Ok(self.data.employees.clone())
  }

  async fn transactions_page(
    &self,
    page: Option<&PageToken>,
  ) -> FetchResult<PaginatedResult<Transaction>> {
    let index = Self::page_index(page)?;
    self.simulate_latency().await;

    let offset = index
      .checked_mul(self.page_size)
      .ok_or_else(|| FetchError::Rejected(format!("Page {} is out of range", index)))?;

    let transactions = self.transactions()?;
    let start = offset.min(transactions.len());
    let end = (start + self.page_size).min(transactions.len());
    let next_page = (end < transactions.len()).then(|| PageToken::new((index + 1).to_string()));
    debug!(index, start, end, "fixture page");

    Ok(PaginatedResult::new(
      transactions[start..end].to_vec(),
      next_page,
    ))
  }

  async fn transactions_by_employee(&self, employee_id: &str) -> FetchResult<Vec<Transaction>> {
    self.simulate_latency().await;
    if !self.data.employees.iter().any(|e| e.id == employee_id) {
      return Err(FetchError::Rejected(format!(
        "Unknown employee {}",
        employee_id
      )));
    }

    Ok(
      self
        .transactions()?
        .iter()
        .filter(|t| t.employee_id == employee_id)
        .cloned()
        .collect(),
    )
  }

  async fn set_transaction_approval(&self, transaction_id: &str, approved: bool) -> FetchResult<()> {
    self.simulate_latency().await;
    let mut transactions = self.transactions()?;
    let transaction = transactions
      .iter_mut()
      .find(|t| t.id == transaction_id)
      .ok_or_else(|| FetchError::Rejected(format!("Unknown transaction {}", transaction_id)))?;
    transaction.approved = approved;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> FixtureSource {
    FixtureSource::sample().unwrap()
  }

  #[test]
  fn test_sample_dataset_parses() {
    let source = sample();
    assert_eq!(source.data.employees.len(), 4);
    assert_eq!(source.transactions().unwrap().len(), 14);
  }

  #[tokio::test]
  async fn test_pages_until_exhausted() {
    let source = sample();

    let first = source.transactions_page(None).await.unwrap();
    assert_eq!(first.data.len(), 5);
    assert_eq!(first.next_page, Some(PageToken::new("1")));

    let second = source
      .transactions_page(first.next_page.as_ref())
      .await
      .unwrap();
    assert_eq!(second.data[0].id, "t-0006");

    let third = source
      .transactions_page(second.next_page.as_ref())
      .await
      .unwrap();
    assert_eq!(third.data.len(), 4);
    assert_eq!(third.next_page, None);
  }

  #[tokio::test]
  async fn test_page_size_is_configurable() {
    let source = sample().with_page_size(14);
    let page = source.transactions_page(None).await.unwrap();
    assert_eq!(page.data.len(), 14);
    assert_eq!(page.next_page, None);
  }

  #[tokio::test]
  async fn test_page_past_the_end_is_empty() {
    let source = sample();
    let page = source
      .transactions_page(Some(&PageToken::new("9")))
      .await
      .unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.next_page, None);
  }

  #[tokio::test]
  async fn test_huge_page_token_is_rejected() {
    let result = sample()
      .transactions_page(Some(&PageToken::new(usize::MAX.to_string())))
      .await;
    assert!(matches!(result, Err(FetchError::Rejected(_))));
  }

  #[tokio::test]
  async fn test_bad_page_token_is_rejected() {
    let result = sample()
      .transactions_page(Some(&PageToken::new("next")))
      .await;
    assert!(matches!(result, Err(FetchError::Rejected(_))));
  }

  #[tokio::test]
  async fn test_transactions_by_employee() {
    let transactions = sample().transactions_by_employee("e-102").await.unwrap();
    let ids: Vec<_> = transactions.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t-0002", "t-0006", "t-0011", "t-0014"]);
  }

  #[tokio::test]
  async fn test_unknown_employee_is_rejected() {
    let result = sample().transactions_by_employee("nobody").await;
    assert!(result.is_err());
  }

  #[tokio::test]
  async fn test_approval_is_stored() {
    let source = sample();
    source
      .set_transaction_approval("t-0001", true)
      .await
      .unwrap();

    let page = source.transactions_page(None).await.unwrap();
    assert!(page.data[0].approved);
  }
}
