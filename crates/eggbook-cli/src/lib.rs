//! The eggbook caller layer.
//!
//! Turns raw user input into validated payloads, drives any [`RecordStore`]
//! and renders what comes back. The `eggbook` binary is a thin clap wrapper
//! around this crate.
//!
//! [`RecordStore`]: eggbook_core::store::RecordStore

pub mod commands;
pub mod error;
pub mod input;
pub mod render;
pub mod settings;

pub use error::{Error, Result};
pub use settings::Settings;
