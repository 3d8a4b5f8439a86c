//! Conversions between domain types and their SQLite column encodings.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use eggbook_core::record::DailyRecord;

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
/// Format produced by SQLite's `CURRENT_TIMESTAMP`, always UTC.
const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column list matching [`RawRecord::from_row`]. Legacy tables may hold NULLs
/// in columns that were added without `NOT NULL`.
pub(crate) const RECORD_COLUMNS: &str = "
  id,
  date,
  COALESCE(produced_eggs, 0),
  COALESCE(breakages, 0),
  COALESCE(sold_eggs, 0),
  COALESCE(price_per_egg, 0),
  COALESCE(credit_amount, 0),
  COALESCE(credit_name, ''),
  created_at";

// ─── Encoding ────────────────────────────────────────────────────────────────

pub(crate) fn encode_date(date: NaiveDate) -> String {
  date.format(DATE_FORMAT).to_string()
}

// ─── Decoding ────────────────────────────────────────────────────────────────

pub(crate) fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

/// Accepts SQLite's `CURRENT_TIMESTAMP` text as well as RFC 3339.
pub(crate) fn decode_timestamp(s: &str) -> Result<DateTime<Utc>> {
  if let Ok(naive) = NaiveDateTime::parse_from_str(s, SQLITE_TIMESTAMP_FORMAT) {
    return Ok(naive.and_utc());
  }
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Raw row ─────────────────────────────────────────────────────────────────

/// A `daily_records` row with text columns not yet parsed.
pub(crate) struct RawRecord {
  pub id:            i64,
  pub date:          String,
  pub produced_eggs: u32,
  pub breakages:     u32,
  pub sold_eggs:     u32,
  pub price_per_egg: f64,
  pub credit_amount: f64,
  pub credit_name:   String,
  pub created_at:    Option<String>,
}

impl RawRecord {
  pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      date:          row.get(1)?,
      produced_eggs: row.get(2)?,
      breakages:     row.get(3)?,
      sold_eggs:     row.get(4)?,
      price_per_egg: row.get(5)?,
      credit_amount: row.get(6)?,
      credit_name:   row.get(7)?,
      created_at:    row.get(8)?,
    })
  }

  /// Parse the text columns. Rows from schemas without `created_at` fall
  /// back to the Unix epoch.
  pub(crate) fn into_record(self) -> Result<DailyRecord> {
    let created_at = match self.created_at.as_deref() {
      Some(s) => decode_timestamp(s)?,
      None    => DateTime::<Utc>::UNIX_EPOCH,
    };

    Ok(DailyRecord {
      id: self.id,
      date: decode_date(&self.date)?,
      produced_eggs: self.produced_eggs,
      breakages: self.breakages,
      sold_eggs: self.sold_eggs,
      price_per_egg: self.price_per_egg,
      credit_amount: self.credit_amount,
      credit_name: self.credit_name,
      created_at,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sqlite_timestamp_is_utc() {
    let dt = decode_timestamp("2024-03-01 06:30:00").unwrap();
    assert_eq!(dt.to_rfc3339(), "2024-03-01T06:30:00+00:00");
  }

  #[test]
  fn rfc3339_timestamp_accepted() {
    let dt = decode_timestamp("2024-03-01T08:30:00+02:00").unwrap();
    assert_eq!(dt.to_rfc3339(), "2024-03-01T06:30:00+00:00");
  }

  #[test]
  fn malformed_date_rejected() {
    assert!(matches!(decode_date("01/03/2024"), Err(Error::DateParse(_))));
  }

  #[test]
  fn date_roundtrip() {
    let d = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    assert_eq!(decode_date(&encode_date(d)).unwrap(), d);
  }
}
