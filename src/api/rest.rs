//! Hosted database client.
//!
//! Speaks the PostgREST dialect exposed by the hosted database service:
//!
//! - `GET    {url}/rest/v1/{table}?select=*&col=op.value&order=..&limit=..`
//! - `POST   {url}/rest/v1/{table}` with `Prefer: return=representation`
//! - `PATCH` / `DELETE` on the same path with filter parameters
//! - `POST   {url}/rest/v1/rpc/{function}` for database functions
//!
//! Every request carries the API key twice, as `apikey` and as a bearer
//! token. Which key is used decides the privilege level: the anonymous key
//! is subject to row-level security, the service key bypasses it.

use super::query::{rest_filter_params, rest_query_params, Filter, Query};
use super::{Backend, DbError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

const REST_PATH: &str = "rest/v1";
const RPC_PATH: &str = "rest/v1/rpc";
const PREFER_REPRESENTATION: &str = "return=representation";

#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PATH, table)
    }

    pub fn rpc_url(&self, function: &str) -> String {
        format!("{}/{}/{}", self.base_url, RPC_PATH, function)
    }

    fn headers(&self) -> Result<HeaderMap, DbError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.api_key).map_err(|e| DbError::InvalidRow(e.to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(|e| DbError::InvalidRow(e.to_string()))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, DbError> {
        let response = request.headers(self.headers()?).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(DbError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn representation(response: Response) -> Result<Vec<Value>, DbError> {
        match response.json::<Value>().await? {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            row => Ok(vec![row]),
        }
    }
}

impl Backend for RestClient {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, DbError> {
        debug!(table = %query.table, filters = query.filters.len(), "select");
        let request = self.client.get(self.table_url(&query.table)).query(&rest_query_params(query));
        let response = self.send(request).await?;
        Self::representation(response).await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, DbError> {
        debug!(table, "insert");
        let request = self.client.post(self.table_url(table)).header("Prefer", PREFER_REPRESENTATION).json(&row);
        let response = self.send(request).await?;
        Self::representation(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DbError::InvalidRow(format!("insert into {} returned no row", table)))
    }

    async fn update(&self, table: &str, filters: &[Filter], patch: Value) -> Result<usize, DbError> {
        if filters.is_empty() {
            return Err(DbError::Unfiltered("update"));
        }
        debug!(table, filters = filters.len(), "update");
        let request = self
            .client
            .patch(self.table_url(table))
            .query(&rest_filter_params(filters))
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&patch);
        let response = self.send(request).await?;
        Ok(Self::representation(response).await?.len())
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<usize, DbError> {
        if filters.is_empty() {
            return Err(DbError::Unfiltered("delete"));
        }
        debug!(table, filters = filters.len(), "delete");
        let request = self
            .client
            .delete(self.table_url(table))
            .query(&rest_filter_params(filters))
            .header("Prefer", PREFER_REPRESENTATION);
        let response = self.send(request).await?;
        Ok(Self::representation(response).await?.len())
    }

    async fn rpc(&self, function: &str, args: Value) -> Result<Value, DbError> {
        debug!(function, "rpc");
        let request = self.client.post(self.rpc_url(function)).json(&args);
        let response = self.send(request).await?;
        Ok(response.json::<Value>().await?)
    }
}
