//! SQLite backend for the eggbook production ledger.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The [`schema`] module brings any
//! earlier on-disk layout of `daily_records` up to date when a store opens.

mod encode;
mod store;

pub mod error;
pub mod schema;

pub use error::{Error, Result};
pub use schema::SchemaReport;
pub use store::SqliteStore;
