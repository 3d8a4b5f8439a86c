//! SQL schema and migrations for the `daily_records` table.
//!
//! Migrations form an ordered list. Progress is recorded in
//! `PRAGMA user_version`; a step runs only once the database's version is
//! below the step's. Databases written before versioning existed arrive at
//! version 0 in several shapes, so each step also carries a predicate over
//! the live table shape that decides whether its SQL is needed at all.

use rusqlite::{Connection, OptionalExtension as _};
use tracing::{info, warn};

/// Name of the only table the store owns.
pub const TABLE: &str = "daily_records";

/// Connection-level settings applied on open.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

/// The current table definition. Idempotent thanks to `IF NOT EXISTS`.
pub const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS daily_records (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    date          TEXT NOT NULL UNIQUE,  -- YYYY-MM-DD
    produced_eggs INTEGER NOT NULL DEFAULT 0,
    breakages     INTEGER NOT NULL DEFAULT 0,
    sold_eggs     INTEGER NOT NULL DEFAULT 0,
    price_per_egg REAL    NOT NULL DEFAULT 0,
    credit_amount REAL    NOT NULL DEFAULT 0,
    credit_name   TEXT    NOT NULL DEFAULT '',
    created_at    TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
";

// ─── Live table shape ────────────────────────────────────────────────────────

/// What the database currently looks like, as far as migrations care.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableShape {
  pub exists:      bool,
  pub columns:     Vec<String>,
  /// Whether some unique index covers exactly the `date` column.
  pub date_unique: bool,
}

impl TableShape {
  pub fn has_column(&self, name: &str) -> bool {
    self.columns.iter().any(|c| c.eq_ignore_ascii_case(name))
  }

  fn missing(&self, name: &str) -> bool {
    self.exists && !self.has_column(name)
  }
}

/// Introspect the `daily_records` table.
pub fn read_shape(conn: &Connection) -> rusqlite::Result<TableShape> {
  let exists = conn
    .query_row(
      "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
      rusqlite::params![TABLE],
      |_| Ok(true),
    )
    .optional()?
    .unwrap_or(false);

  if !exists {
    return Ok(TableShape::default());
  }

  let columns = conn
    .prepare("SELECT name FROM pragma_table_info(?1)")?
    .query_map(rusqlite::params![TABLE], |row| row.get::<_, String>(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let unique_indexes = conn
    .prepare(r#"SELECT name FROM pragma_index_list(?1) WHERE "unique" = 1"#)?
    .query_map(rusqlite::params![TABLE], |row| row.get::<_, String>(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut date_unique = false;
  for index in unique_indexes {
    let indexed = conn
      .prepare("SELECT name FROM pragma_index_info(?1)")?
      .query_map(rusqlite::params![index], |row| row.get::<_, Option<String>>(0))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    if indexed.len() == 1 && indexed[0].as_deref() == Some("date") {
      date_unique = true;
      break;
    }
  }

  Ok(TableShape { exists, columns, date_unique })
}

fn user_version(conn: &Connection) -> rusqlite::Result<u32> {
  conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

// ─── Migration steps ─────────────────────────────────────────────────────────

/// One step of the schema history.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
  pub version:     u32,
  pub description: &'static str,
  /// Whether this database needs `sql` at all.
  pub needed:      fn(&TableShape) -> bool,
  pub sql:         &'static str,
  /// Safe to run again on a later start. Only such steps still run after an
  /// earlier step failed, since `user_version` cannot record them.
  pub retry_safe:  bool,
}

fn table_absent(shape: &TableShape) -> bool {
  !shape.exists
}

fn sold_eggs_missing(shape: &TableShape) -> bool {
  shape.missing("sold_eggs")
}

fn credit_amount_missing(shape: &TableShape) -> bool {
  shape.missing("credit_amount")
}

fn credit_name_missing(shape: &TableShape) -> bool {
  shape.missing("credit_name")
}

fn legacy_credits_present(shape: &TableShape) -> bool {
  shape.has_column("credits") && shape.has_column("credit_amount")
}

fn date_not_unique(shape: &TableShape) -> bool {
  shape.exists && !shape.date_unique
}

/// The full schema history, in application order.
pub const MIGRATIONS: &[Migration] = &[
  Migration {
    version:     1,
    description: "create daily_records",
    needed:      table_absent,
    sql:         CREATE_TABLE,
    retry_safe:  true,
  },
  Migration {
    version:     2,
    description: "add sold_eggs column",
    needed:      sold_eggs_missing,
    sql:         "ALTER TABLE daily_records ADD COLUMN sold_eggs INTEGER NOT NULL DEFAULT 0;",
    retry_safe:  true,
  },
  Migration {
    version:     3,
    description: "add credit_amount column",
    needed:      credit_amount_missing,
    sql:         "ALTER TABLE daily_records ADD COLUMN credit_amount REAL NOT NULL DEFAULT 0;",
    retry_safe:  true,
  },
  Migration {
    version:     4,
    description: "add credit_name column",
    needed:      credit_name_missing,
    sql:         "ALTER TABLE daily_records ADD COLUMN credit_name TEXT NOT NULL DEFAULT '';",
    retry_safe:  true,
  },
  // One-time copy out of the pre-credit_amount column. Rows that already
  // carry a non-zero credit_amount keep it.
  Migration {
    version:     5,
    description: "backfill credit_amount from legacy credits",
    needed:      legacy_credits_present,
    sql:         "UPDATE daily_records
                  SET credit_amount = credits
                  WHERE credits IS NOT NULL
                    AND COALESCE(credit_amount, 0) = 0;",
    retry_safe:  false,
  },
  Migration {
    version:     6,
    description: "add unique index on date",
    needed:      date_not_unique,
    sql:         "CREATE UNIQUE INDEX IF NOT EXISTS daily_records_date_idx ON daily_records(date);",
    retry_safe:  true,
  },
];

/// Version reached once every migration has run.
pub const SCHEMA_VERSION: u32 = MIGRATIONS[MIGRATIONS.len() - 1].version;

// ─── Report ──────────────────────────────────────────────────────────────────

/// A migration step that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFailure {
  pub version:     u32,
  pub description: &'static str,
  pub message:     String,
}

/// Outcome of [`ensure_schema`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
  pub from_version: u32,
  pub to_version:   u32,
  /// Steps whose SQL actually ran, in order.
  pub applied:      Vec<&'static str>,
  /// Steps that failed. `to_version` stays below the first one.
  pub failures:     Vec<MigrationFailure>,
  /// Detection failed and the table definition was reissued blindly.
  pub recreated:    bool,
}

impl SchemaReport {
  /// Nothing was changed.
  pub fn is_noop(&self) -> bool {
    self.applied.is_empty() && self.from_version == self.to_version && !self.recreated
  }

  pub fn is_clean(&self) -> bool {
    self.failures.is_empty() && !self.recreated
  }
}

// ─── Runner ──────────────────────────────────────────────────────────────────

fn detect(conn: &Connection) -> rusqlite::Result<(u32, TableShape)> {
  Ok((user_version(conn)?, read_shape(conn)?))
}

/// Run one step and, when `bump` is set, advance `user_version`, atomically.
fn apply(
  conn:  &mut Connection,
  step:  &Migration,
  shape: &TableShape,
  bump:  bool,
) -> rusqlite::Result<bool> {
  let needed = (step.needed)(shape);
  let tx = conn.transaction()?;
  if needed {
    tx.execute_batch(step.sql)?;
  }
  if bump {
    tx.pragma_update(None, "user_version", step.version)?;
  }
  tx.commit()?;
  Ok(needed)
}

/// Bring `daily_records` up to [`SCHEMA_VERSION`].
///
/// Safe to call on every start. The table is recreated whenever it is
/// missing, whatever `user_version` says. Step failures are logged and
/// reported, not returned: `user_version` stays below the first failed step
/// so it is retried next time, while later retry-safe steps still run. Only
/// a failure to reissue the table definition is an `Err`.
pub fn ensure_schema(conn: &mut Connection) -> rusqlite::Result<SchemaReport> {
  let mut report = SchemaReport::default();

  let (version, mut shape) = match detect(conn) {
    Ok(found) => found,
    Err(err) => {
      warn!(error = %err, "schema detection failed; reissuing table definition");
      conn.execute_batch(CREATE_TABLE)?;
      report.recreated = true;
      detect(conn)?
    }
  };

  report.from_version = version;
  report.to_version   = version;

  if !shape.exists {
    conn.execute_batch(CREATE_TABLE)?;
    info!("created daily_records");
    report.applied.push(MIGRATIONS[0].description);
    shape = read_shape(conn)?;
  }

  let mut held_back = false;
  for step in MIGRATIONS.iter().filter(|m| m.version > version) {
    if held_back && !step.retry_safe {
      continue;
    }

    match apply(conn, step, &shape, !held_back) {
      Ok(true) => {
        info!(version = step.version, "applied migration: {}", step.description);
        report.applied.push(step.description);
      }
      Ok(false) => {}
      Err(err) => {
        warn!(version = step.version, error = %err, "migration failed: {}", step.description);
        report.failures.push(MigrationFailure {
          version:     step.version,
          description: step.description,
          message:     err.to_string(),
        });
        held_back = true;
      }
    }
    if !held_back {
      report.to_version = step.version;
    }

    shape = match read_shape(conn) {
      Ok(shape) => shape,
      Err(err) => {
        warn!(error = %err, "could not re-read table shape; stopping migrations");
        report.failures.push(MigrationFailure {
          version:     step.version,
          description: "re-read table shape",
          message:     err.to_string(),
        });
        break;
      }
    };
  }

  Ok(report)
}
