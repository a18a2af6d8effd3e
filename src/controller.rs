//! View controller for the transaction list.
//!
//! Reconciles the employee directory, the paginated transaction feed and the
//! employee-scoped transaction feed into one displayed list. Exactly one of
//! the two transaction caches is authoritative at a time, chosen by the
//! active [`Filter`]; selecting a filter invalidates the other cache.
//!
//! Every operation is an `async fn(&mut self)`, so the controller is the only
//! writer of its caches and fetches are sequenced by `.await`.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{DataSource, Employee, FetchResult, PageToken, Transaction};
use crate::cache::{EmployeeCache, EmployeeTransactionCache, PaginatedTransactionCache};

/// Which transaction source drives the displayed list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
  /// Paginated feed of every transaction
  #[default]
  All,
  /// Transactions for one employee id
  Employee(String),
}

impl From<&Employee> for Filter {
  fn from(employee: &Employee) -> Self {
    if employee.is_empty_sentinel() {
      Filter::All
    } else {
      Filter::Employee(employee.id.clone())
    }
  }
}

/// Where the view is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewPhase {
  /// Nothing fetched yet
  #[default]
  Uninitialized,
  LoadingAll,
  ShowingAll {
    has_more: bool,
  },
  LoadingByEmployee {
    employee_id: String,
  },
  ShowingByEmployee {
    employee_id: String,
  },
}

/// Everything the UI needs to draw the transaction view
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
  /// `None` until the directory has been fetched
  pub employees: Option<Vec<Employee>>,
  pub employees_loading: bool,
  pub transactions: Vec<Transaction>,
  pub transactions_loading: bool,
  pub filter: Filter,
  pub has_more: bool,
  pub next_page: Option<PageToken>,
  pub phase: ViewPhase,
}

impl Snapshot {
  /// Picker entries: the "All Employees" sentinel followed by the directory.
  /// Empty while the directory is not loaded.
  pub fn employee_options(&self) -> Vec<Employee> {
    match &self.employees {
      Some(employees) => std::iter::once(Employee::empty())
        .chain(employees.iter().cloned())
        .collect(),
      None => Vec::new(),
    }
  }

  /// Display name for an employee id, if it is in the directory
  pub fn employee_name(&self, employee_id: &str) -> Option<String> {
    self
      .employees
      .as_ref()?
      .iter()
      .find(|e| e.id == employee_id)
      .map(Employee::full_name)
  }

  pub fn is_paginated(&self) -> bool {
    self.filter == Filter::All
  }

  /// The "view more" control is shown
  pub fn view_more_visible(&self) -> bool {
    self.is_paginated() && !self.transactions.is_empty()
  }

  /// The "view more" control can be triggered
  pub fn view_more_enabled(&self) -> bool {
    self.view_more_visible() && self.has_more && self.next_page.is_some()
  }
}

/// Owns the three caches and the displayed list.
pub struct ViewController<S> {
  source: S,
  employees: EmployeeCache,
  paginated: PaginatedTransactionCache,
  by_employee: EmployeeTransactionCache,
  filter: Filter,
  /// Displayed list. Approval changes live only here.
  transactions: Vec<Transaction>,
  /// Cleared when a page comes back empty even though a cursor existed
  has_more: bool,
  loading: bool,
  publisher: Option<watch::Sender<Snapshot>>,
}

impl<S: DataSource> ViewController<S> {
  pub fn new(source: S) -> Self {
    Self {
      source,
      employees: EmployeeCache::new(),
      paginated: PaginatedTransactionCache::new(),
      by_employee: EmployeeTransactionCache::new(),
      filter: Filter::All,
      transactions: Vec::new(),
      has_more: true,
      loading: false,
      publisher: None,
    }
  }

  /// Publish a fresh snapshot on every state change
  pub fn with_publisher(mut self, publisher: watch::Sender<Snapshot>) -> Self {
    self.publisher = Some(publisher);
    self
  }

  pub fn filter(&self) -> &Filter {
    &self.filter
  }

  #[cfg(test)]
  pub fn transactions(&self) -> &[Transaction] {
    &self.transactions
  }

  #[cfg(test)]
  pub fn paginated(&self) -> &PaginatedTransactionCache {
    &self.paginated
  }

  #[cfg(test)]
  pub fn by_employee(&self) -> &EmployeeTransactionCache {
    &self.by_employee
  }

  #[cfg(test)]
  pub fn has_more(&self) -> bool {
    self.has_more
  }

  #[cfg(test)]
  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn phase(&self) -> ViewPhase {
    match (&self.filter, self.loading) {
      (Filter::All, true) => ViewPhase::LoadingAll,
      (Filter::Employee(id), true) => ViewPhase::LoadingByEmployee {
        employee_id: id.clone(),
      },
      _ if !self.employees.is_loaded()
        && !self.paginated.is_loaded()
        && !self.by_employee.is_loaded() =>
      {
        ViewPhase::Uninitialized
      }
      (Filter::All, false) => ViewPhase::ShowingAll {
        has_more: self.has_more && self.paginated.next_page().is_some(),
      },
      (Filter::Employee(id), false) => ViewPhase::ShowingByEmployee {
        employee_id: id.clone(),
      },
    }
  }

  pub fn snapshot(&self) -> Snapshot {
    Snapshot {
      employees: self.employees.employees().map(<[_]>::to_vec),
      employees_loading: self.employees.is_loading()
        || (self.loading && self.filter == Filter::All && !self.employees.is_loaded()),
      transactions: self.transactions.clone(),
      transactions_loading: self.loading,
      filter: self.filter.clone(),
      has_more: self.has_more,
      next_page: self.paginated.next_page().cloned(),
      phase: self.phase(),
    }
  }

  /// "View more" is reachable: showing all, list non-empty, and neither the
  /// latch nor the cursor says the feed is done.
  pub fn can_view_more(&self) -> bool {
    self.filter == Filter::All
      && !self.loading
      && !self.transactions.is_empty()
      && self.has_more
      && self.paginated.next_page().is_some()
  }

  /// Initial load: runs "load all" unless the directory is loaded or loading.
  pub async fn mount(&mut self) -> FetchResult<()> {
    if self.employees.is_loaded() || self.employees.is_loading() {
      debug!("already mounted");
      return Ok(());
    }
    self.show_all().await
  }

  /// Switch the filter. `None` (nothing picked) is ignored, as is picking the
  /// active filter again while its data is loaded.
  pub async fn select_employee(&mut self, selection: Option<&Employee>) -> FetchResult<()> {
    let Some(employee) = selection else {
      return Ok(());
    };

    let filter = Filter::from(employee);
    if filter == self.filter && self.authoritative_is_loaded() {
      debug!(?filter, "filter unchanged");
      return Ok(());
    }

    match filter {
      Filter::All => self.show_all().await,
      Filter::Employee(employee_id) => self.show_employee(employee_id).await,
    }
  }

  /// Fetch the next page and append its rows to the displayed list.
  ///
  /// A no-op unless [`can_view_more`](Self::can_view_more). An empty page
  /// latches `has_more` off. Returns the number of rows appended.
  pub async fn view_more(&mut self) -> FetchResult<usize> {
    if !self.can_view_more() {
      debug!("view more not available");
      return Ok(0);
    }

    self.by_employee.invalidate_data();
    let appended = self.load_all().await?;

    if appended == 0 {
      info!("empty page, no more transactions");
      self.has_more = false;
    } else {
      let rows = self.paginated.transactions().unwrap_or_default();
      self
        .transactions
        .extend_from_slice(&rows[rows.len() - appended..]);
    }

    self.publish();
    Ok(appended)
  }

  /// Drop the authoritative cache and reload it from scratch
  pub async fn refresh(&mut self) -> FetchResult<()> {
    match self.filter.clone() {
      Filter::All => {
        self.employees.invalidate_data();
        self.paginated.invalidate_data();
        self.show_all().await
      }
      Filter::Employee(employee_id) => {
        self.by_employee.invalidate_data();
        self.show_employee(employee_id).await
      }
    }
  }

  /// Set `approved` on one displayed transaction. Local only: caches are not
  /// touched and nothing is fetched. Returns whether the id was found.
  pub fn update_transaction(&mut self, transaction_id: &str, approved: bool) -> bool {
    match self
      .transactions
      .iter_mut()
      .find(|t| t.id == transaction_id)
    {
      Some(transaction) => {
        transaction.approved = approved;
        self.publish();
        true
      }
      None => {
        debug!(transaction_id, "approval for transaction not on screen");
        false
      }
    }
  }

  /// Apply an approval locally, then persist it at the source.
  ///
  /// A failed write is returned to the caller; the local change stays.
  pub async fn set_transaction_approval(
    &mut self,
    transaction_id: &str,
    approved: bool,
  ) -> FetchResult<bool> {
    if !self.update_transaction(transaction_id, approved) {
      return Ok(false);
    }

    if let Err(e) = self
      .source
      .set_transaction_approval(transaction_id, approved)
      .await
    {
      warn!(transaction_id, error = %e, "failed to persist approval");
      return Err(e);
    }
    Ok(true)
  }

  fn authoritative_is_loaded(&self) -> bool {
    match &self.filter {
      Filter::All => self.paginated.is_loaded(),
      Filter::Employee(id) => self.by_employee.transactions_for(id).is_some(),
    }
  }

  async fn show_all(&mut self) -> FetchResult<()> {
    info!("showing all transactions");
    // The filter switches before the fetch. A failed fetch leaves the new
    // filter over the previous rows until the user retries.
    self.filter = Filter::All;
    self.has_more = true;
    self.by_employee.invalidate_data();

    self.load_all().await?;

    self.transactions = self
      .paginated
      .transactions()
      .unwrap_or_default()
      .to_vec();
    self.publish();
    Ok(())
  }

  async fn show_employee(&mut self, employee_id: String) -> FetchResult<()> {
    info!(%employee_id, "showing transactions for employee");
    // Switched up front, as in show_all
    self.filter = Filter::Employee(employee_id.clone());
    // A later return to "all" must start again from page 1
    self.paginated.invalidate_data();

    self.set_loading(true);
    let result = self
      .by_employee
      .fetch_by_id(&self.source, &employee_id)
      .await
      .map(|_| ());
    self.set_loading(false);
    result?;

    if let Some(rows) = self.by_employee.transactions_for(&employee_id) {
      self.transactions = rows.to_vec();
    }
    self.publish();
    Ok(())
  }

  /// Directory first, then the next transaction page. Returns rows appended.
  async fn load_all(&mut self) -> FetchResult<usize> {
    self.set_loading(true);
    let result = self.fetch_directory_then_page().await;
    self.set_loading(false);

    if let Err(e) = &result {
      warn!(error = %e, "load all failed");
    }
    result
  }

  async fn fetch_directory_then_page(&mut self) -> FetchResult<usize> {
    self.employees.fetch_all(&self.source).await?;
    self.publish();
    self.paginated.fetch_all(&self.source).await
  }

  fn set_loading(&mut self, loading: bool) {
    self.loading = loading;
    self.publish();
  }

  fn publish(&self) {
    if let Some(publisher) = &self.publisher {
      publisher.send_replace(self.snapshot());
    }
  }
}
