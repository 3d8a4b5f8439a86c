//! Error types for `eggbook-core`.

use thiserror::Error;

/// A write payload that breaks one of the ledger rules.
///
/// These are checked by the caller before anything reaches the store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
  #[error("breakages ({breakages}) cannot exceed produced eggs ({produced})")]
  BreakagesExceedProduced { produced: u32, breakages: u32 },

  #[error("sold eggs ({sold}) cannot exceed available eggs ({available})")]
  SoldExceedsAvailable { sold: u32, available: u32 },

  #[error("{field} must be a non-negative number, got {value}")]
  NegativeAmount { field: &'static str, value: f64 },

  #[error("credit amount must be greater than zero, got {0}")]
  NonPositiveCredit(f64),

  #[error("credit name must not be empty")]
  EmptyCreditName,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
