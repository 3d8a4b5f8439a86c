//! Parsing of raw form values.
//!
//! Blank optional fields mean zero, so a user can leave breakages, sales or
//! credit empty. Used as clap value parsers.

use chrono::{Local, NaiveDate};

/// Parse an egg count; blank is zero.
pub fn parse_count(raw: &str) -> Result<u32, String> {
  let raw = raw.trim();
  if raw.is_empty() {
    return Ok(0);
  }
  raw
    .parse::<u32>()
    .map_err(|_| format!("{raw:?} is not a whole number of eggs"))
}

/// Parse a money amount; blank is zero.
pub fn parse_amount(raw: &str) -> Result<f64, String> {
  let raw = raw.trim();
  if raw.is_empty() {
    return Ok(0.0);
  }
  match raw.parse::<f64>() {
    Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
    _ => Err(format!("{raw:?} is not a non-negative amount")),
  }
}

/// Parse a `YYYY-MM-DD` date; blank is today.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
  let raw = raw.trim();
  if raw.is_empty() {
    return Ok(today());
  }
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .map_err(|_| format!("{raw:?} is not a date in YYYY-MM-DD form"))
}

pub fn today() -> NaiveDate {
  Local::now().date_naive()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_fields_default_to_zero() {
    assert_eq!(parse_count(""), Ok(0));
    assert_eq!(parse_count("  "), Ok(0));
    assert_eq!(parse_amount(""), Ok(0.0));
  }

  #[test]
  fn numbers_are_trimmed() {
    assert_eq!(parse_count(" 42 "), Ok(42));
    assert_eq!(parse_amount("0.35"), Ok(0.35));
  }

  #[test]
  fn bad_numbers_rejected() {
    assert!(parse_count("-3").is_err());
    assert!(parse_count("ten").is_err());
    assert!(parse_amount("-0.5").is_err());
    assert!(parse_amount("inf").is_err());
  }

  #[test]
  fn dates() {
    assert_eq!(
      parse_date("2024-02-29"),
      Ok(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
    );
    assert!(parse_date("29/02/2024").is_err());
    assert_eq!(parse_date(""), Ok(today()));
  }
}
