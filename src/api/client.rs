use crate::api::api_types::{ApiEmployee, ApiPaginatedResponse, ApiTransaction};
use crate::api::types::{Employee, PageToken, PaginatedResult, Transaction};
use crate::api::{DataSource, FetchError, FetchResult};
use color_eyre::{eyre::eyre, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Transaction API client over HTTP
#[derive(Clone)]
pub struct HttpSource {
  client: reqwest::Client,
  base_url: Url,
}

impl HttpSource {
  pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
    // Trailing slash so relative joins stay under the base path
    let normalized = if base_url.ends_with('/') {
      base_url.to_string()
    } else {
      format!("{}/", base_url)
    };
    let base_url =
      Url::parse(&normalized).map_err(|e| eyre!("Invalid API url {}: {}", base_url, e))?;

    let mut headers = HeaderMap::new();
    if let Some(token) = token {
      let value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| eyre!("Invalid API token: {}", e))?;
      headers.insert(AUTHORIZATION, value);
    }

    let client = reqwest::Client::builder()
      .default_headers(headers)
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { client, base_url })
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  fn endpoint(&self, path: &str) -> FetchResult<Url> {
    self
      .base_url
      .join(path)
      .map_err(|e| FetchError::Rejected(format!("Invalid endpoint {}: {}", path, e)))
  }

  async fn get_json<T: DeserializeOwned>(&self, url: Url) -> FetchResult<T> {
    let endpoint = url.path().to_string();
    debug!(%url, "GET");

    let response = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|source| FetchError::Transport {
        endpoint: endpoint.clone(),
        source,
      })?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        endpoint,
        status: status.as_u16(),
      });
    }

    let body = response
      .bytes()
      .await
      .map_err(|source| FetchError::Transport {
        endpoint: endpoint.clone(),
        source,
      })?;

    serde_json::from_slice(&body).map_err(|source| FetchError::Decode { endpoint, source })
  }
}

impl DataSource for HttpSource {
  async fn employees(&self) -> FetchResult<Vec<Employee>> {
    let url = self.endpoint("employees")?;
    let employees: Vec<ApiEmployee> = self.get_json(url).await?;
    Ok(employees.into_iter().map(Employee::from).collect())
  }

  async fn transactions_page(
    &self,
    page: Option<&PageToken>,
  ) -> FetchResult<PaginatedResult<Transaction>> {
    let mut url = self.endpoint("transactions")?;
    if let Some(page) = page {
      url.query_pairs_mut().append_pair("page", page.as_str());
    }
    let response: ApiPaginatedResponse = self.get_json(url).await?;
    Ok(response.into_result())
  }

  async fn transactions_by_employee(&self, employee_id: &str) -> FetchResult<Vec<Transaction>> {
    let mut url = self.endpoint("transactions")?;
    url
      .query_pairs_mut()
      .append_pair("employeeId", employee_id);
    let transactions: Vec<ApiTransaction> = self.get_json(url).await?;
    Ok(transactions.into_iter().map(Transaction::from).collect())
  }

  async fn set_transaction_approval(&self, transaction_id: &str, approved: bool) -> FetchResult<()> {
    let url = self.endpoint(&format!("transactions/{}/approval", transaction_id))?;
    let endpoint = url.path().to_string();
    let body = serde_json::json!({ "value": approved }).to_string();

    debug!(%url, approved, "POST");
    let response = self
      .client
      .post(url)
      .header(CONTENT_TYPE, "application/json")
      .body(body)
      .send()
      .await
      .map_err(|source| FetchError::Transport {
        endpoint: endpoint.clone(),
        source,
      })?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        endpoint,
        status: status.as_u16(),
      });
    }
    Ok(())
  }
}
