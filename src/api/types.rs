use chrono::NaiveDate;
use std::fmt;

/// Id of the "All Employees" sentinel. Never belongs to a real record.
pub const EMPTY_EMPLOYEE_ID: &str = "";

/// Employee directory record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
  pub id: String,
  pub first_name: String,
  pub last_name: String,
}

impl Employee {
  /// The "no filter" entry offered at the top of the employee picker
  pub fn empty() -> Self {
    Self {
      id: EMPTY_EMPLOYEE_ID.to_string(),
      first_name: "All".to_string(),
      last_name: "Employees".to_string(),
    }
  }

  pub fn is_empty_sentinel(&self) -> bool {
    self.id == EMPTY_EMPLOYEE_ID
  }

  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

/// A single transaction. Only `approved` is ever changed after a fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
  pub id: String,
  pub employee_id: String,
  pub amount: f64,
  pub merchant: String,
  pub date: NaiveDate,
  pub approved: bool,
}

/// Opaque cursor into the paginated transaction source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageToken(String);

impl PageToken {
  pub fn new(token: impl Into<String>) -> Self {
    Self(token.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for PageToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// One page of results. `next_page == None` means the source is exhausted.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResult<T> {
  pub data: Vec<T>,
  pub next_page: Option<PageToken>,
}

impl<T> PaginatedResult<T> {
  pub fn new(data: Vec<T>, next_page: Option<PageToken>) -> Self {
    Self { data, next_page }
  }
}
