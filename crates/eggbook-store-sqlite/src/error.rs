//! Error type for `eggbook-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] eggbook_core::Error),

  /// The storage engine failed (I/O, SQL, closed connection).
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A raw insert collided with an existing row, e.g. a duplicate date.
  #[error("constraint violation: {0}")]
  ConstraintViolation(String),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Error {
  /// Map constraint failures reported by SQLite to
  /// [`Error::ConstraintViolation`]; anything else stays a database error.
  pub(crate) fn from_insert(err: tokio_rusqlite::Error) -> Self {
    match err {
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(code, msg))
        if code.code == rusqlite::ErrorCode::ConstraintViolation =>
      {
        Error::ConstraintViolation(msg.unwrap_or_else(|| code.to_string()))
      }
      other => Error::Database(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
