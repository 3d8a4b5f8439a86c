//! The `RecordStore` trait.
//!
//! Implemented by storage backends (e.g. `eggbook-store-sqlite`). The
//! command-line caller depends on this abstraction, not on a concrete backend.
//!
//! The store trusts its caller: payloads are expected to have passed
//! [`NewDailyRecord::validate`] or [`CreditEntry::validate`] already.

use std::future::Future;

use chrono::NaiveDate;

use crate::record::{CreditEntry, DailyRecord, NewDailyRecord, RecordId, Summary};

/// Abstraction over an eggbook storage backend.
///
/// Write operations report the number of rows they touched.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert or replace the record for `record.date`.
  ///
  /// Every value, credit fields included, is overwritten. Afterwards exactly
  /// one row for the date holds exactly the given values.
  fn upsert_daily_record(
    &self,
    record: NewDailyRecord,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Insert a record for a date that must not exist yet.
  ///
  /// Fails with a constraint violation if the date is already recorded.
  fn insert_daily_record(
    &self,
    record: NewDailyRecord,
  ) -> impl Future<Output = Result<RecordId, Self::Error>> + Send + '_;

  /// Add credit to `date` without touching production or sales figures.
  ///
  /// The amount is added to any existing credit and the name is appended to
  /// the existing list. A date with no record gets a new one with zero
  /// production.
  fn add_credit_only(
    &self,
    date: NaiveDate,
    credit: CreditEntry,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Delete a record by id. An unknown id affects zero rows.
  fn delete_record(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// The record for `date`, if one exists.
  fn get_record(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<DailyRecord>, Self::Error>> + Send + '_;

  /// At most `limit` records, most recent date first.
  fn list_records(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<DailyRecord>, Self::Error>> + Send + '_;

  /// Totals over all records. Zero for an empty store.
  fn compute_summary(
    &self,
  ) -> impl Future<Output = Result<Summary, Self::Error>> + Send + '_;

  /// Every record, oldest date first.
  fn export_all_records(
    &self,
  ) -> impl Future<Output = Result<Vec<DailyRecord>, Self::Error>> + Send + '_;
}
