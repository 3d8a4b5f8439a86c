//! `eggbook` — record daily egg production from the command line.
//!
//! # Usage
//!
//! ```
//! eggbook save --produced 120 --breakages 3 --sold 100 --price 0.25
//! eggbook credit --amount 4.50 --name "Ama"
//! eggbook list --limit 10
//! eggbook export --output eggs.csv
//! ```

use std::{
  fs,
  io::{self, BufWriter},
  path::PathBuf,
};

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use eggbook_cli::{
  commands::{self, SaveOutcome},
  input, render,
  settings::{expand_tilde, Settings},
};
use eggbook_core::record::{CreditEntry, NewDailyRecord, RecordId};
use eggbook_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Daily egg production ledger")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "eggbook.toml")]
  config: PathBuf,

  /// SQLite database file; overrides `database_path` from the config.
  #[arg(long, value_name = "FILE")]
  database: Option<PathBuf>,

  /// Print records and totals as JSON.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Save the full record for a day, replacing any existing one.
  Save {
    /// Day in YYYY-MM-DD form (default: today).
    #[arg(long, value_parser = input::parse_date)]
    date: Option<NaiveDate>,
    #[arg(long, value_parser = input::parse_count)]
    produced: u32,
    #[arg(long, value_parser = input::parse_count, default_value = "0")]
    breakages: u32,
    #[arg(long, value_parser = input::parse_count, default_value = "0")]
    sold: u32,
    /// Price per egg.
    #[arg(long, value_parser = input::parse_amount)]
    price: f64,
    #[arg(long, value_parser = input::parse_amount, default_value = "0")]
    credit_amount: f64,
    #[arg(long, default_value = "")]
    credit_name: String,
  },
  /// Add credit taken by a customer without touching the day's figures.
  Credit {
    #[arg(long, value_parser = input::parse_date)]
    date: Option<NaiveDate>,
    #[arg(long, value_parser = input::parse_amount)]
    amount: f64,
    /// Customer name.
    #[arg(long)]
    name: String,
  },
  /// Show the most recent records, newest first.
  List {
    #[arg(long)]
    limit: Option<usize>,
  },
  /// Delete a record by its ID.
  Delete { id: RecordId },
  /// Show totals over every record.
  Summary,
  /// Export every record as CSV, oldest first.
  Export {
    /// Write to FILE instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so stdout carries only command output.
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = Settings::load(&cli.config)?;
  let db_path = match &cli.database {
    Some(path) => expand_tilde(path),
    None       => settings.resolved_database_path(),
  };

  if let Some(parent) = db_path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }

  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open store at {db_path:?}"))?;

  run(cli.command, cli.json, &settings, &store).await
}

async fn run(
  command:  Command,
  json:     bool,
  settings: &Settings,
  store:    &SqliteStore,
) -> anyhow::Result<()> {
  match command {
    Command::Save { date, produced, breakages, sold, price, credit_amount, credit_name } => {
      let date = date.unwrap_or_else(input::today);
      let record = NewDailyRecord {
        date,
        produced_eggs: produced,
        breakages,
        sold_eggs: sold,
        price_per_egg: price,
        credit_amount,
        credit_name: credit_name.trim().to_owned(),
      };
      let outcome = commands::save(store, record).await.context("save failed")?;
      match outcome {
        SaveOutcome::Created  => println!("Saved record for {date}."),
        SaveOutcome::Replaced => println!("Replaced record for {date}."),
      }
    }

    Command::Credit { date, amount, name } => {
      let date = date.unwrap_or_else(input::today);
      let merged = commands::add_credit(store, date, CreditEntry::new(amount, name))
        .await
        .context("adding credit failed")?;
      if let Some(r) = merged {
        println!(
          "Credit for {date} is now {:.2} ({}).",
          r.credit_amount, r.credit_name
        );
      }
    }

    Command::List { limit } => {
      let records = commands::recent(store, limit.unwrap_or(settings.recent_limit))
        .await
        .context("listing records failed")?;
      if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
      } else {
        print!("{}", render::record_table(&records));
      }
    }

    Command::Delete { id } => {
      if commands::delete(store, id).await.context("delete failed")? {
        println!("Deleted record {id}.");
      } else {
        println!("No record with ID {id}.");
      }
    }

    Command::Summary => {
      let totals = commands::summary(store).await.context("summary failed")?;
      if json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
      } else {
        print!("{}", render::summary(&totals));
      }
    }

    Command::Export { output } => match output {
      Some(path) => {
        let file = fs::File::create(&path)
          .with_context(|| format!("failed to create {}", path.display()))?;
        let rows = commands::export_csv(store, BufWriter::new(file))
          .await
          .context("export failed")?;
        println!("Exported {rows} records to {}.", path.display());
      }
      None => {
        commands::export_csv(store, io::stdout())
          .await
          .context("export failed")?;
      }
    },
  }

  Ok(())
}
