//! Daily record types — one row of the ledger per calendar date.
//!
//! The date is the natural key: at most one [`DailyRecord`] exists per date.
//! A full save replaces every value for the date, while a credit-only entry
//! merges into whatever credit the date already carries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Surrogate identity assigned by the store.
pub type RecordId = i64;

/// Separator used when several customers take credit on the same date.
pub const CREDIT_NAME_SEPARATOR: &str = ", ";

// ─── Stored record ───────────────────────────────────────────────────────────

/// A persisted daily record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
  pub id:            RecordId,
  pub date:          NaiveDate,
  pub produced_eggs: u32,
  pub breakages:     u32,
  pub sold_eggs:     u32,
  pub price_per_egg: f64,
  /// Outstanding credit for the date, accumulated across credit entries.
  pub credit_amount: f64,
  /// Comma-joined customer names, in the order the credit was recorded.
  pub credit_name:   String,
  /// Set by the store on first write; never updated.
  pub created_at:    DateTime<Utc>,
}

impl DailyRecord {
  /// Eggs left over after breakages and sales.
  ///
  /// Signed: rows written before sales were validated may oversell.
  pub fn remaining_eggs(&self) -> i64 {
    i64::from(self.produced_eggs) - i64::from(self.breakages) - i64::from(self.sold_eggs)
  }

  /// Cash taken for the day's sales.
  pub fn cash_sales(&self) -> f64 {
    f64::from(self.sold_eggs) * self.price_per_egg
  }
}

// ─── Write payloads ──────────────────────────────────────────────────────────

/// Input for a full save of one date. Every field overwrites the stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDailyRecord {
  pub date:          NaiveDate,
  pub produced_eggs: u32,
  #[serde(default)]
  pub breakages:     u32,
  #[serde(default)]
  pub sold_eggs:     u32,
  pub price_per_egg: f64,
  #[serde(default)]
  pub credit_amount: f64,
  #[serde(default)]
  pub credit_name:   String,
}

impl NewDailyRecord {
  /// A record with only production and price filled in.
  pub fn new(date: NaiveDate, produced_eggs: u32, price_per_egg: f64) -> Self {
    Self {
      date,
      produced_eggs,
      breakages: 0,
      sold_eggs: 0,
      price_per_egg,
      credit_amount: 0.0,
      credit_name: String::new(),
    }
  }

  /// Eggs that can still be sold once breakages are accounted for.
  pub fn available_eggs(&self) -> u32 {
    self.produced_eggs.saturating_sub(self.breakages)
  }

  /// Check the ledger rules for a full save.
  pub fn validate(&self) -> Result<()> {
    if self.breakages > self.produced_eggs {
      return Err(Error::BreakagesExceedProduced {
        produced:  self.produced_eggs,
        breakages: self.breakages,
      });
    }
    if self.sold_eggs > self.available_eggs() {
      return Err(Error::SoldExceedsAvailable {
        sold:      self.sold_eggs,
        available: self.available_eggs(),
      });
    }
    check_amount("price per egg", self.price_per_egg)?;
    check_amount("credit amount", self.credit_amount)?;
    Ok(())
  }
}

/// Input for a credit-only entry against a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditEntry {
  pub amount: f64,
  pub name:   String,
}

impl CreditEntry {
  pub fn new(amount: f64, name: impl Into<String>) -> Self {
    Self { amount, name: name.into() }
  }

  pub fn validate(&self) -> Result<()> {
    if !self.amount.is_finite() || self.amount <= 0.0 {
      return Err(Error::NonPositiveCredit(self.amount));
    }
    if self.name.trim().is_empty() {
      return Err(Error::EmptyCreditName);
    }
    Ok(())
  }
}

fn check_amount(field: &'static str, value: f64) -> Result<()> {
  if value.is_finite() && value >= 0.0 {
    Ok(())
  } else {
    Err(Error::NegativeAmount { field, value })
  }
}

/// Append `name` to an accumulated credit-name list.
pub fn merge_credit_names(existing: &str, name: &str) -> String {
  if existing.is_empty() {
    name.to_owned()
  } else {
    format!("{existing}{CREDIT_NAME_SEPARATOR}{name}")
  }
}

// ─── Aggregate ───────────────────────────────────────────────────────────────

/// Totals over every stored record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
  pub total_produced:   i64,
  pub total_breakages:  i64,
  pub total_sold:       i64,
  /// Sum over rows of `sold_eggs * price_per_egg`.
  pub total_cash_sales: f64,
  pub total_credits:    f64,
}
