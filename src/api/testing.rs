//! Scripted data source for controller and cache tests.

use crate::api::types::{Employee, PageToken, PaginatedResult, Transaction};
use crate::api::{DataSource, FetchError, FetchResult};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A request seen by the scripted source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  Employees,
  Page(Option<String>),
  ByEmployee(String),
  Approval(String, bool),
}

#[derive(Debug, Default)]
struct Script {
  employees: Vec<Employee>,
  pages: HashMap<Option<String>, PaginatedResult<Transaction>>,
  by_employee: HashMap<String, Vec<Transaction>>,
  fail_employees: bool,
  fail_pages: bool,
  fail_by_employee: bool,
  fail_approvals: bool,
  calls: Vec<Call>,
}

/// Clones share one script, so a test can keep a handle after giving the
/// source to a controller.
#[derive(Clone, Default)]
pub struct ScriptedSource {
  script: Arc<Mutex<Script>>,
}

impl ScriptedSource {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_employees(self, employees: Vec<Employee>) -> Self {
    self.script.lock().unwrap().employees = employees;
    self
  }

  /// Respond to `page` with `data` and `next`
  pub fn with_page(self, page: Option<&str>, data: Vec<Transaction>, next: Option<&str>) -> Self {
    self.script.lock().unwrap().pages.insert(
      page.map(String::from),
      PaginatedResult::new(data, next.map(PageToken::new)),
    );
    self
  }

  pub fn with_employee_transactions(self, employee_id: &str, data: Vec<Transaction>) -> Self {
    self
      .script
      .lock()
      .unwrap()
      .by_employee
      .insert(employee_id.to_string(), data);
    self
  }

  pub fn fail_employees(&self, fail: bool) {
    self.script.lock().unwrap().fail_employees = fail;
  }

  pub fn fail_pages(&self, fail: bool) {
    self.script.lock().unwrap().fail_pages = fail;
  }

  pub fn fail_by_employee(&self, fail: bool) {
    self.script.lock().unwrap().fail_by_employee = fail;
  }

  pub fn fail_approvals(&self, fail: bool) {
    self.script.lock().unwrap().fail_approvals = fail;
  }

  pub fn calls(&self) -> Vec<Call> {
    self.script.lock().unwrap().calls.clone()
  }

  pub fn clear_calls(&self) {
    self.script.lock().unwrap().calls.clear();
  }

  fn record(&self, call: Call) {
    self.script.lock().unwrap().calls.push(call);
  }
}

impl DataSource for ScriptedSource {
  async fn employees(&self) -> FetchResult<Vec<Employee>> {
    self.record(Call::Employees);
    tokio::task::yield_now().await;
    let script = self.script.lock().unwrap();
    if script.fail_employees {
      return Err(FetchError::Rejected("employees unavailable".to_string()));
    }
    Ok(script.employees.clone())
  }

  async fn transactions_page(
    &self,
    page: Option<&PageToken>,
  ) -> FetchResult<PaginatedResult<Transaction>> {
    let key = page.map(|p| p.as_str().to_string());
    self.record(Call::Page(key.clone()));
    tokio::task::yield_now().await;
    let script = self.script.lock().unwrap();
    if script.fail_pages {
      return Err(FetchError::Rejected("transactions unavailable".to_string()));
    }
    script
      .pages
      .get(&key)
      .cloned()
      .ok_or_else(|| FetchError::Rejected(format!("no page scripted for {:?}", key)))
  }

  async fn transactions_by_employee(&self, employee_id: &str) -> FetchResult<Vec<Transaction>> {
    self.record(Call::ByEmployee(employee_id.to_string()));
    tokio::task::yield_now().await;
    let script = self.script.lock().unwrap();
    if script.fail_by_employee {
      return Err(FetchError::Rejected("transactions unavailable".to_string()));
    }
    Ok(
      script
        .by_employee
        .get(employee_id)
        .cloned()
        .unwrap_or_default(),
    )
  }

  async fn set_transaction_approval(&self, transaction_id: &str, approved: bool) -> FetchResult<()> {
    self.record(Call::Approval(transaction_id.to_string(), approved));
    tokio::task::yield_now().await;
    if self.script.lock().unwrap().fail_approvals {
      return Err(FetchError::Rejected("approval rejected".to_string()));
    }
    Ok(())
  }
}

pub fn employee(id: &str) -> Employee {
  Employee {
    id: id.to_string(),
    first_name: format!("First-{}", id),
    last_name: format!("Last-{}", id),
  }
}

pub fn transaction(id: &str, employee_id: &str) -> Transaction {
  Transaction {
    id: id.to_string(),
    employee_id: employee_id.to_string(),
    amount: 10.0,
    merchant: format!("Merchant {}", id),
    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    approved: false,
  }
}
