//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use tracing::{debug, info, warn};

use eggbook_core::{
  record::{merge_credit_names, CreditEntry, DailyRecord, NewDailyRecord, RecordId, Summary},
  store::RecordStore,
};

use crate::{
  encode::{encode_date, RawRecord, RECORD_COLUMNS},
  schema::{self, SchemaReport},
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An egg-production ledger backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and bring its schema up to date.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    info!(path = %path.display(), "opening store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(schema::PRAGMAS)?;
        Ok(())
      })
      .await?;

    let store = Self { conn };
    let report = store.ensure_schema().await?;
    if !report.is_clean() {
      for failure in &report.failures {
        warn!(
          version = failure.version,
          error = %failure.message,
          "schema step not applied: {}; it will be retried on next open",
          failure.description
        );
      }
      warn!(
        version = report.to_version,
        recreated = report.recreated,
        "schema is not fully migrated; continuing"
      );
    }
    Ok(store)
  }

  /// Run the schema migrations. Idempotent; a second call is a no-op.
  pub async fn ensure_schema(&self) -> Result<SchemaReport> {
    let report = self
      .conn
      .call(|conn| Ok(schema::ensure_schema(conn)?))
      .await?;

    if report.applied.is_empty() {
      debug!(version = report.to_version, "schema up to date");
    } else {
      info!(
        from = report.from_version,
        to = report.to_version,
        applied = report.applied.len(),
        "schema migrated"
      );
    }
    Ok(report)
  }

  async fn query_records(&self, sql: String, limit: Option<i64>) -> Result<Vec<DailyRecord>> {
    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = match limit {
          Some(n) => stmt
            .query_map(rusqlite::params![n], RawRecord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawRecord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    // A legacy row with an unreadable date is skipped, not fatal to the
    // whole listing.
    Ok(
      raws
        .into_iter()
        .filter_map(|raw| {
          let id = raw.id;
          match raw.into_record() {
            Ok(record) => Some(record),
            Err(err) => {
              warn!(id, error = %err, "skipping unreadable daily record");
              None
            }
          }
        })
        .collect(),
    )
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn upsert_daily_record(&self, record: NewDailyRecord) -> Result<usize> {
    let date_str = encode_date(record.date);
    debug!(date = %date_str, "upserting daily record");

    let rows = self
      .conn
      .call(move |conn| {
        // Update in place so the row keeps its id and created_at. Not
        // ON CONFLICT: tables whose unique index on date could not be built
        // must still accept saves.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let updated = tx.execute(
          "UPDATE daily_records SET
             produced_eggs = ?2,
             breakages     = ?3,
             sold_eggs     = ?4,
             price_per_egg = ?5,
             credit_amount = ?6,
             credit_name   = ?7
           WHERE date = ?1",
          rusqlite::params![
            date_str,
            record.produced_eggs,
            record.breakages,
            record.sold_eggs,
            record.price_per_egg,
            record.credit_amount,
            record.credit_name,
          ],
        )?;

        let rows = if updated > 0 {
          updated
        } else {
          tx.execute(
            "INSERT INTO daily_records (
               date, produced_eggs, breakages, sold_eggs,
               price_per_egg, credit_amount, credit_name
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
              date_str,
              record.produced_eggs,
              record.breakages,
              record.sold_eggs,
              record.price_per_egg,
              record.credit_amount,
              record.credit_name,
            ],
          )?
        };

        tx.commit()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  async fn insert_daily_record(&self, record: NewDailyRecord) -> Result<RecordId> {
    let date_str = encode_date(record.date);
    debug!(date = %date_str, "inserting daily record");

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO daily_records (
             date, produced_eggs, breakages, sold_eggs,
             price_per_egg, credit_amount, credit_name
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            date_str,
            record.produced_eggs,
            record.breakages,
            record.sold_eggs,
            record.price_per_egg,
            record.credit_amount,
            record.credit_name,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(Error::from_insert)
  }

  async fn add_credit_only(&self, date: NaiveDate, credit: CreditEntry) -> Result<usize> {
    let date_str = encode_date(date);
    debug!(date = %date_str, amount = credit.amount, "adding credit");

    let rows = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<(i64, f64, String)> = tx
          .query_row(
            "SELECT id, COALESCE(credit_amount, 0), COALESCE(credit_name, '')
             FROM daily_records WHERE date = ?1",
            rusqlite::params![date_str],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
          )
          .optional()?;

        let rows = match existing {
          Some((id, amount, names)) => tx.execute(
            "UPDATE daily_records SET credit_amount = ?1, credit_name = ?2 WHERE id = ?3",
            rusqlite::params![
              amount + credit.amount,
              merge_credit_names(&names, &credit.name),
              id,
            ],
          )?,
          None => tx.execute(
            "INSERT INTO daily_records (
               date, produced_eggs, breakages, sold_eggs,
               price_per_egg, credit_amount, credit_name
             ) VALUES (?1, 0, 0, 0, 0, ?2, ?3)",
            rusqlite::params![date_str, credit.amount, credit.name],
          )?,
        };

        tx.commit()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  async fn delete_record(&self, id: RecordId) -> Result<usize> {
    debug!(id, "deleting daily record");
    let rows = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM daily_records WHERE id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(rows)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_record(&self, date: NaiveDate) -> Result<Option<DailyRecord>> {
    let date_str = encode_date(date);

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM daily_records WHERE date = ?1"),
            rusqlite::params![date_str],
            RawRecord::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn list_records(&self, limit: usize) -> Result<Vec<DailyRecord>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    self
      .query_records(
        format!("SELECT {RECORD_COLUMNS} FROM daily_records ORDER BY date DESC LIMIT ?1"),
        Some(limit),
      )
      .await
  }

  async fn compute_summary(&self) -> Result<Summary> {
    let summary = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT
             COALESCE(SUM(produced_eggs), 0),
             COALESCE(SUM(breakages), 0),
             COALESCE(SUM(sold_eggs), 0),
             COALESCE(SUM(sold_eggs * price_per_egg), 0.0),
             COALESCE(SUM(credit_amount), 0.0)
           FROM daily_records",
          [],
          |row| {
            Ok(Summary {
              total_produced:   row.get(0)?,
              total_breakages:  row.get(1)?,
              total_sold:       row.get(2)?,
              total_cash_sales: row.get(3)?,
              total_credits:    row.get(4)?,
            })
          },
        )?)
      })
      .await?;

    Ok(summary)
  }

  async fn export_all_records(&self) -> Result<Vec<DailyRecord>> {
    self
      .query_records(
        format!("SELECT {RECORD_COLUMNS} FROM daily_records ORDER BY date ASC"),
        None,
      )
      .await
  }
}
