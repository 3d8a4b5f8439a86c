//! Core types and trait definitions for the eggbook production ledger.
//!
//! This crate is deliberately free of database dependencies. The storage
//! backend and the command-line caller both depend on it.

pub mod error;
pub mod export;
pub mod record;
pub mod store;

pub use error::{Error, Result};
