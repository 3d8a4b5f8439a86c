//! One function per user action, generic over the storage backend.
//!
//! Every write is validated here before it reaches the store.

use std::io::Write;

use chrono::NaiveDate;
use eggbook_core::{
  export,
  record::{CreditEntry, DailyRecord, NewDailyRecord, RecordId, Summary},
  store::RecordStore,
};
use tracing::debug;

use crate::{Error, Result};

/// What a full save did to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
  Created,
  /// A record for the date existed and every value was overwritten.
  Replaced,
}

pub async fn save<S: RecordStore>(store: &S, record: NewDailyRecord) -> Result<SaveOutcome> {
  record.validate()?;

  let existed = store
    .get_record(record.date)
    .await
    .map_err(Error::store)?
    .is_some();

  store
    .upsert_daily_record(record)
    .await
    .map_err(Error::store)?;

  Ok(if existed { SaveOutcome::Replaced } else { SaveOutcome::Created })
}

/// Record credit for `date` and return the merged record.
pub async fn add_credit<S: RecordStore>(
  store:  &S,
  date:   NaiveDate,
  credit: CreditEntry,
) -> Result<Option<DailyRecord>> {
  credit.validate()?;
  let credit = CreditEntry { name: credit.name.trim().to_owned(), ..credit };

  store
    .add_credit_only(date, credit)
    .await
    .map_err(Error::store)?;

  store.get_record(date).await.map_err(Error::store)
}

pub async fn recent<S: RecordStore>(store: &S, limit: usize) -> Result<Vec<DailyRecord>> {
  store.list_records(limit).await.map_err(Error::store)
}

/// Delete a record. `false` means no record had that id.
pub async fn delete<S: RecordStore>(store: &S, id: RecordId) -> Result<bool> {
  let rows = store.delete_record(id).await.map_err(Error::store)?;
  debug!(id, rows, "delete finished");
  Ok(rows > 0)
}

pub async fn summary<S: RecordStore>(store: &S) -> Result<Summary> {
  store.compute_summary().await.map_err(Error::store)
}

/// Write every record as CSV to `out`, returning how many rows were written.
pub async fn export_csv<S: RecordStore, W: Write>(store: &S, out: W) -> Result<usize> {
  let records = store.export_all_records().await.map_err(Error::store)?;
  export::write_csv(&records, out)?;
  Ok(records.len())
}

#[cfg(test)]
mod tests {
  use eggbook_store_sqlite::SqliteStore;

  use super::*;

  async fn store() -> SqliteStore {
    SqliteStore::open_in_memory().await.unwrap()
  }

  fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
  }

  #[tokio::test]
  async fn save_reports_created_then_replaced() {
    let s = store().await;
    let rec = NewDailyRecord::new(day(1), 30, 0.2);

    assert_eq!(save(&s, rec.clone()).await.unwrap(), SaveOutcome::Created);
    assert_eq!(save(&s, rec).await.unwrap(), SaveOutcome::Replaced);
  }

  #[tokio::test]
  async fn invalid_save_writes_nothing() {
    let s = store().await;
    let mut rec = NewDailyRecord::new(day(2), 10, 0.2);
    rec.breakages = 2;
    rec.sold_eggs = 9;

    let err = save(&s, rec).await.unwrap_err();
    assert!(matches!(
      err,
      Error::Invalid(eggbook_core::Error::SoldExceedsAvailable { sold: 9, available: 8 })
    ));
    assert!(recent(&s, 30).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn credit_is_trimmed_and_merged() {
    let s = store().await;
    add_credit(&s, day(3), CreditEntry::new(2.0, " Esi ")).await.unwrap();
    let merged = add_credit(&s, day(3), CreditEntry::new(1.0, "Kwame"))
      .await
      .unwrap()
      .unwrap();

    assert_eq!(merged.credit_amount, 3.0);
    assert_eq!(merged.credit_name, "Esi, Kwame");
  }

  #[tokio::test]
  async fn zero_credit_rejected() {
    let s = store().await;
    let err = add_credit(&s, day(4), CreditEntry::new(0.0, "Esi"))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Invalid(_)));
  }

  #[tokio::test]
  async fn delete_unknown_is_false() {
    let s = store().await;
    assert!(!delete(&s, 99).await.unwrap());
  }

  #[tokio::test]
  async fn export_writes_header_and_rows() {
    let s = store().await;
    save(&s, NewDailyRecord::new(day(6), 12, 0.5)).await.unwrap();
    save(&s, NewDailyRecord::new(day(5), 10, 0.5)).await.unwrap();

    let mut buf = Vec::new();
    let rows = export_csv(&s, &mut buf).await.unwrap();
    assert_eq!(rows, 2);

    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], eggbook_core::export::CSV_HEADER);
    assert!(lines[1].starts_with("2024-09-05,10,"));
    assert!(lines[2].starts_with("2024-09-06,12,"));
  }
}
