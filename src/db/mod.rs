//! Persistence layer.
//!
//! The local SQLite store and its migrations live here, together with one
//! repository per table group. Repositories are generic over
//! [`Backend`](crate::api::Backend), so the same code runs against the
//! hosted database and the local file.
//!
//! ```rust
//! use backoffice::db::expenses::{ExpenseInput, Expenses};
//! use backoffice::db::local::LocalStore;
//!
//! let store = LocalStore::open_in_memory().unwrap();
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let expenses = Expenses::new(&store);
//!     let input = ExpenseInput {
//!         month: "2026-10".to_string(),
//!         category: "travel".to_string(),
//!         amount: 120.0,
//!         description: None,
//!     };
//!     expenses.add(&input, None).await.unwrap();
//!     assert_eq!(expenses.summary("2026-10").await.unwrap().total, 120.0);
//! });
//! ```

/// SQLite connection setup.
pub mod db;

/// Versioned schema changes for the local store.
pub mod migrations;

/// Column layout shared by the local store's SQL builder.
pub mod schema;

/// [`Backend`](crate::api::Backend) over SQLite.
pub mod local;

pub mod attendance;
pub mod expenses;
pub mod kpi;
pub mod members;
pub mod news;
pub mod recruitment;
pub mod schedules;
