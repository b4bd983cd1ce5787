//! # Backoffice - corporate admin console
//!
//! A command-line back-office for a small company, backed by a hosted
//! PostgREST database or a local SQLite file.
//!
//! ## Features
//!
//! - **Sessions**: Email/password sign-in with a 24 hour lifetime and a 30 minute idle timeout
//! - **Attendance**: Check-in, check-out, late detection and monthly summaries
//! - **Schedules**: Company events with categories and locations
//! - **KPI**: Indicators, monthly targets and append-only progress
//! - **Recruitment**: Candidate pipeline, interviews and ratings
//! - **News and Expenses**: Internal articles and monthly spending
//! - **Calendar and Dashboard**: Merged month view and a start-of-day overview
//!
//! ## Usage
//!
//! ```rust,no_run
//! use backoffice::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
