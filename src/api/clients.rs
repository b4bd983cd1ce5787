use super::query::{Filter, Query};
use super::rest::RestClient;
use super::{Backend, DbError};
use crate::db::local::LocalStore;
use crate::libs::config::DatabaseConfig;
use crate::libs::messages::Message;
use crate::msg_debug;
use anyhow::Result;
use serde_json::Value;
use std::path::Path;
use tracing::warn;

/// Either backend behind one concrete type, so commands need no generics.
#[derive(Debug, Clone)]
pub enum Database {
    Hosted(RestClient),
    Local(LocalStore),
}

impl Backend for Database {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, DbError> {
        match self {
            Database::Hosted(client) => client.select(query).await,
            Database::Local(store) => store.select(query).await,
        }
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, DbError> {
        match self {
            Database::Hosted(client) => client.insert(table, row).await,
            Database::Local(store) => store.insert(table, row).await,
        }
    }

    async fn update(&self, table: &str, filters: &[Filter], patch: Value) -> Result<usize, DbError> {
        match self {
            Database::Hosted(client) => client.update(table, filters, patch).await,
            Database::Local(store) => store.update(table, filters, patch).await,
        }
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<usize, DbError> {
        match self {
            Database::Hosted(client) => client.delete(table, filters).await,
            Database::Local(store) => store.delete(table, filters).await,
        }
    }

    async fn rpc(&self, function: &str, args: Value) -> Result<Value, DbError> {
        match self {
            Database::Hosted(client) => client.rpc(function, args).await,
            Database::Local(store) => store.rpc(function, args).await,
        }
    }
}

/// Database handles, one per privilege level.
///
/// The elevated handle bypasses row-level security and is only present when
/// a service key is configured. The local store has no row-level security,
/// so it serves both levels.
#[derive(Debug, Clone)]
pub struct Clients {
    standard: Database,
    elevated: Option<Database>,
}

impl Clients {
    pub fn new(standard: Database, elevated: Option<Database>) -> Self {
        Self { standard, elevated }
    }

    pub fn hosted(config: &DatabaseConfig) -> Self {
        let standard = Database::Hosted(RestClient::new(&config.url, &config.anon_key));
        let elevated = config
            .service_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(|key| Database::Hosted(RestClient::new(&config.url, key)));
        Self { standard, elevated }
    }

    pub fn local(path: &Path) -> Result<Self> {
        let store = LocalStore::open(path)?;
        msg_debug!(Message::UsingLocalDatabase(path.display().to_string()));
        Ok(Self {
            standard: Database::Local(store.clone()),
            elevated: Some(Database::Local(store)),
        })
    }

    pub fn standard(&self) -> &Database {
        &self.standard
    }

    /// Elevated handle, or the standard one with a warning when no service key is set.
    pub fn elevated(&self) -> &Database {
        match &self.elevated {
            Some(elevated) => elevated,
            None => {
                warn!("{}", Message::ElevatedClientMissing);
                &self.standard
            }
        }
    }

    pub fn has_elevated(&self) -> bool {
        self.elevated.is_some()
    }
}
