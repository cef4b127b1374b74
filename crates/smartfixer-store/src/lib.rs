//! # smartfixer-store
//!
//! Local storage for SmartFixer. A synchronous [`Database`] handle wraps a
//! `rusqlite::Connection`, runs schema migrations on open and exposes typed
//! helpers for past fixes and the expert directory. Writes bump per-table
//! revisions so [`LiveQuery`] subscribers see new rows without polling.
//!
//! User preferences live outside SQLite in a small JSON file managed by
//! [`PreferenceStore`].

pub mod database;
pub mod experts;
pub mod live;
pub mod migrations;
pub mod models;
pub mod past_fixes;
pub mod preferences;
pub mod seed;

mod error;

pub use database::{Database, Revisions, SharedDatabase, Table};
pub use error::{Result, StoreError};
pub use live::LiveQuery;
pub use models::*;
pub use preferences::PreferenceStore;
