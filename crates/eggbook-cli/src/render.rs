//! Plain-text rendering of records and totals. Money shows two decimals.

use eggbook_core::record::{DailyRecord, Summary};

const RECORD_HEADER: &str =
  "    ID  Date        Produced  Broken  Sold  Left   Price    Cash  Credit  Customers";

pub fn record_table(records: &[DailyRecord]) -> String {
  if records.is_empty() {
    return "No records yet.\n".to_owned();
  }

  let mut out = String::new();
  out.push_str(RECORD_HEADER);
  out.push('\n');
  for r in records {
    out.push_str(&format!(
      "{:>6}  {}  {:>8}  {:>6}  {:>4}  {:>4}  {:>6.2}  {:>6.2}  {:>6.2}  {}\n",
      r.id,
      r.date.format("%Y-%m-%d"),
      r.produced_eggs,
      r.breakages,
      r.sold_eggs,
      r.remaining_eggs(),
      r.price_per_egg,
      r.cash_sales(),
      r.credit_amount,
      r.credit_name,
    ));
  }
  out
}

pub fn summary(s: &Summary) -> String {
  format!(
    "Total produced:   {}\n\
     Total breakages:  {}\n\
     Total sold:       {}\n\
     Cash sales:       {:.2}\n\
     Credits:          {:.2}\n",
    s.total_produced, s.total_breakages, s.total_sold, s.total_cash_sales, s.total_credits,
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_table_message() {
    assert_eq!(record_table(&[]), "No records yet.\n");
  }

  #[test]
  fn summary_uses_two_decimals() {
    let text = summary(&Summary {
      total_produced:   30,
      total_breakages:  1,
      total_sold:       15,
      total_cash_sales: 25.0,
      total_credits:    3.0,
    });
    assert!(text.contains("Cash sales:       25.00"));
    assert!(text.contains("Credits:          3.00"));
    assert!(text.contains("Total produced:   30"));
  }
}
