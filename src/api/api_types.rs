//! Serde types matching the transaction API's JSON bodies.
//!
//! These are kept apart from the domain types so the wire format (camelCase
//! keys, nested employee objects) does not leak into the controller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::{Employee, PageToken, PaginatedResult, Transaction};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEmployee {
  pub id: String,
  pub first_name: String,
  pub last_name: String,
}

impl From<ApiEmployee> for Employee {
  fn from(e: ApiEmployee) -> Self {
    Employee {
      id: e.id,
      first_name: e.first_name,
      last_name: e.last_name,
    }
  }
}

/// Transactions embed their employee; only the id is kept.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiEmployeeRef {
  pub id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiTransaction {
  pub id: String,
  pub amount: f64,
  pub employee: ApiEmployeeRef,
  pub merchant: String,
  pub date: NaiveDate,
  #[serde(default)]
  pub approved: bool,
}

impl From<ApiTransaction> for Transaction {
  fn from(t: ApiTransaction) -> Self {
    Transaction {
      id: t.id,
      employee_id: t.employee.id,
      amount: t.amount,
      merchant: t.merchant,
      date: t.date,
      approved: t.approved,
    }
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPaginatedResponse {
  #[serde(default)]
  pub data: Vec<ApiTransaction>,
  pub next_page: Option<serde_json::Value>,
}

impl ApiPaginatedResponse {
  pub fn into_result(self) -> PaginatedResult<Transaction> {
    // Servers use both numeric and string cursors
    let next_page = match self.next_page {
      Some(serde_json::Value::String(s)) => Some(PageToken::new(s)),
      Some(serde_json::Value::Number(n)) => Some(PageToken::new(n.to_string())),
      _ => None,
    };
    PaginatedResult::new(
      self.data.into_iter().map(Transaction::from).collect(),
      next_page,
    )
  }
}

/// On-disk layout of a fixture dataset
#[derive(Debug, Deserialize)]
pub struct ApiDataset {
  pub employees: Vec<ApiEmployee>,
  pub transactions: Vec<ApiTransaction>,
}
