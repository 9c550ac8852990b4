//! Runtime configuration: defaults, an optional TOML file, `LEDGER_*`
//! environment variables and command-line overrides, in increasing priority.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use ledger_core::reference::SeedData;
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:      String,
  pub port:      u16,
  /// SQLite database file.
  pub db_path:   PathBuf,
  /// Base directory; photos live in its `photos/` subdirectory.
  pub store_dir: PathBuf,
  /// Payers and categories registered at startup.
  #[serde(default)]
  pub seed:      SeedData,
}

/// Values given on the command line. They win over every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  pub db_path:   Option<PathBuf>,
  pub store_dir: Option<PathBuf>,
}

impl ServerConfig {
  /// Load the configuration. A missing `file` is not an error.
  pub fn load(file: &Path, overrides: &Overrides) -> Result<Self, ConfigError> {
    Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 8080)?
      .set_default("db_path", "exps.db")?
      .set_default("store_dir", ".")?
      .add_source(File::from(file).required(false))
      .add_source(Environment::with_prefix("LEDGER"))
      .set_override_option("db_path", path_value(overrides.db_path.as_deref()))?
      .set_override_option("store_dir", path_value(overrides.store_dir.as_deref()))?
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

fn path_value(path: Option<&Path>) -> Option<String> {
  path.map(|p| p.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ServerConfig::load(&dir.path().join("absent.toml"), &Overrides::default())
      .unwrap();

    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.db_path, PathBuf::from("exps.db"));
    assert_eq!(cfg.store_dir, PathBuf::from("."));
    assert!(cfg.seed.is_empty());
  }

  #[test]
  fn file_values_and_seed_are_read() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    std::fs::write(
      &file,
      r#"
        host = "127.0.0.1"
        port = 9000
        db_path = "/var/lib/ledger/exps.db"

        [seed]
        payers = ["mat", "paulka"]
        categories = ["groceries"]
      "#,
    )
    .unwrap();

    let cfg = ServerConfig::load(&file, &Overrides::default()).unwrap();

    assert_eq!(cfg.address(), "127.0.0.1:9000");
    assert_eq!(cfg.db_path, PathBuf::from("/var/lib/ledger/exps.db"));
    assert_eq!(cfg.seed.payers, vec!["mat", "paulka"]);
    assert_eq!(cfg.seed.categories, vec!["groceries"]);
  }

  #[test]
  fn overrides_beat_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    std::fs::write(&file, "db_path = \"from-file.db\"\nstore_dir = \"from-file\"\n").unwrap();

    let overrides = Overrides {
      db_path:   Some(PathBuf::from("cli.db")),
      store_dir: None,
    };
    let cfg = ServerConfig::load(&file, &overrides).unwrap();

    assert_eq!(cfg.db_path, PathBuf::from("cli.db"));
    assert_eq!(cfg.store_dir, PathBuf::from("from-file"));
  }
}
