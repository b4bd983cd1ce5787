//! Database client abstraction.
//!
//! Every data manager talks to the database through the [`Backend`] trait:
//! filtered selects, row inserts, updates and deletes by filter, and remote
//! procedure calls. Two implementations exist:
//!
//! - [`rest::RestClient`]: the hosted database, spoken to over its
//!   PostgREST-style HTTP interface with an API key
//! - [`crate::db::local::LocalStore`]: a SQLite file with the same tables,
//!   used when no hosted database is configured
//!
//! [`clients::Clients`] holds one handle per privilege level and is built
//! once at startup, then passed down explicitly.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub mod clients;
pub mod query;
pub mod rest;

pub use clients::{Clients, Database};
pub use query::{Filter, FilterOp, Query};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database returned {status}: {message}")]
    Http { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not decode row: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("unknown table '{0}'")]
    UnknownTable(String),
    #[error("unknown column '{column}' on table '{table}'")]
    UnknownColumn { table: String, column: String },
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("refusing to {0} without a filter")]
    Unfiltered(&'static str),
    #[error("malformed row: {0}")]
    InvalidRow(String),
}

#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Fetches all rows matching the query as JSON objects.
    async fn select(&self, query: &Query) -> Result<Vec<Value>, DbError>;

    /// Inserts one row and returns it as stored, including generated ids.
    async fn insert(&self, table: &str, row: Value) -> Result<Value, DbError>;

    /// Applies `patch` to every row matching `filters`; returns the number of rows changed.
    async fn update(&self, table: &str, filters: &[Filter], patch: Value) -> Result<usize, DbError>;

    /// Deletes every row matching `filters`; returns the number of rows removed.
    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<usize, DbError>;

    /// Calls a database function by name.
    async fn rpc(&self, function: &str, args: Value) -> Result<Value, DbError>;

    async fn fetch<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>, DbError> {
        let rows = self.select(query).await?;
        rows.into_iter().map(|row| serde_json::from_value(row).map_err(DbError::from)).collect()
    }

    async fn fetch_one<T: DeserializeOwned>(&self, query: Query) -> Result<Option<T>, DbError> {
        let mut rows = self.fetch::<T>(&query.limit(1)).await?;
        Ok(rows.pop())
    }

    async fn create<T: Serialize, R: DeserializeOwned>(&self, table: &str, row: &T) -> Result<R, DbError> {
        let stored = self.insert(table, serde_json::to_value(row)?).await?;
        Ok(serde_json::from_value(stored)?)
    }
}
