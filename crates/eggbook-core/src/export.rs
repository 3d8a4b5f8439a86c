//! Comma-separated export of daily records.
//!
//! One header line, then one line per record in the order given. Monetary
//! columns carry two decimals and the credit name is always quoted.

use std::io::{self, Write};

use crate::record::DailyRecord;

pub const CSV_HEADER: &str = "Date,Produced Eggs,Breakages,Sold Eggs,Remaining Eggs,Price Per Egg,Cash Sales,Credit Amount,Credit Name";

// ─── Field escaping ──────────────────────────────────────────────────────────

/// Quote a text field, doubling any embedded quotes.
fn quote(s: &str) -> String {
  format!("\"{}\"", s.replace('"', "\"\""))
}

fn csv_line(record: &DailyRecord) -> String {
  format!(
    "{},{},{},{},{},{:.2},{:.2},{:.2},{}",
    record.date.format("%Y-%m-%d"),
    record.produced_eggs,
    record.breakages,
    record.sold_eggs,
    record.remaining_eggs(),
    record.price_per_egg,
    record.cash_sales(),
    record.credit_amount,
    quote(&record.credit_name),
  )
}

// ─── Writers ─────────────────────────────────────────────────────────────────

/// Write `records` as CSV to `out`.
pub fn write_csv<W: Write>(records: &[DailyRecord], mut out: W) -> io::Result<()> {
  writeln!(out, "{CSV_HEADER}")?;
  for record in records {
    writeln!(out, "{}", csv_line(record))?;
  }
  out.flush()
}

/// Render `records` as a CSV string.
pub fn to_csv(records: &[DailyRecord]) -> String {
  let mut text = String::with_capacity(CSV_HEADER.len() + 1 + records.len() * 64);
  text.push_str(CSV_HEADER);
  text.push('\n');
  for record in records {
    text.push_str(&csv_line(record));
    text.push('\n');
  }
  text
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};

  use super::*;

  fn record(day: u32, credit_name: &str) -> DailyRecord {
    DailyRecord {
      id:            i64::from(day),
      date:          NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
      produced_eggs: 120,
      breakages:     5,
      sold_eggs:     100,
      price_per_egg: 0.25,
      credit_amount: 7.5,
      credit_name:   credit_name.into(),
      created_at:    Utc::now(),
    }
  }

  #[test]
  fn header_only_for_empty_export() {
    assert_eq!(to_csv(&[]), format!("{CSV_HEADER}\n"));
  }

  #[test]
  fn row_has_derived_columns() {
    let text = to_csv(&[record(2, "Joe, Ann")]);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "2024-05-02,120,5,100,15,0.25,25.00,7.50,\"Joe, Ann\"");
  }

  #[test]
  fn embedded_quotes_are_doubled() {
    let text = to_csv(&[record(3, "Big \"J\"")]);
    assert!(text.ends_with(",\"Big \"\"J\"\"\"\n"));
  }

  #[test]
  fn writer_matches_string_rendering() {
    let records = vec![record(1, ""), record(2, "Ann")];
    let mut buf = Vec::new();
    write_csv(&records, &mut buf).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), to_csv(&records));
  }
}
