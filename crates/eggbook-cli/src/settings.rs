//! Runtime settings, read from an optional TOML file and `EGGBOOK_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Rows shown by `list` when neither the flag nor the settings say otherwise.
pub const DEFAULT_RECENT_LIMIT: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
  #[serde(default = "default_database_path")]
  pub database_path: PathBuf,
  #[serde(default = "default_recent_limit")]
  pub recent_limit:  usize,
}

fn default_database_path() -> PathBuf {
  PathBuf::from("~/.local/share/eggbook/eggbook.db")
}

fn default_recent_limit() -> usize {
  DEFAULT_RECENT_LIMIT
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      database_path: default_database_path(),
      recent_limit:  DEFAULT_RECENT_LIMIT,
    }
  }
}

impl Settings {
  /// Layer `file` (if it exists) under the environment.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(file.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("EGGBOOK").try_parsing(true))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise Settings")
  }

  /// The database path with `~` expanded.
  pub fn resolved_database_path(&self) -> PathBuf {
    expand_tilde(&self.database_path)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings.recent_limit, DEFAULT_RECENT_LIMIT);
  }

  #[test]
  fn file_values_override_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "database_path = \"/tmp/farm.db\"\nrecent_limit = 7").unwrap();

    let settings = Settings::load(file.path()).unwrap();
    assert_eq!(settings.database_path, PathBuf::from("/tmp/farm.db"));
    assert_eq!(settings.recent_limit, 7);
  }

  #[test]
  fn absolute_paths_are_left_alone() {
    let p = Path::new("/var/lib/eggbook.db");
    assert_eq!(expand_tilde(p), p.to_path_buf());
  }
}
