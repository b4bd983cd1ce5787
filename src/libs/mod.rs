//! Core library modules of the back-office.
//!
//! - **Session**: credential checks, the session lifecycle, activity
//!   debouncing and the foreground keeper
//! - **Infrastructure**: configuration, data storage, clock, messages
//! - **Presentation**: calendar and dashboard assembly, formatting, tables
//!
//! ```rust
//! use backoffice::libs::session::{MemorySessionStore, SessionContext, SessionState};
//! use backoffice::libs::clock::SystemClock;
//!
//! let mut ctx = SessionContext::new(MemorySessionStore::new(), SystemClock);
//! assert_eq!(ctx.check_session().unwrap(), SessionState::Unauthenticated);
//! ```

pub mod activity;
pub mod auth;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod data_storage;
pub mod formatter;
pub mod keeper;
pub mod messages;
pub mod role;
pub mod session;
pub mod validation;
pub mod view;
