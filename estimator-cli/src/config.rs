//! Application configuration.
//!
//! Loaded from a TOML file; every field is optional. Example:
//!
//! ```toml
//! rates_file = "rates.csv"
//! debounce_ms = 200
//! calculation_delay_ms = 2500
//! draft_max_age_days = 7
//! confirm_restore = true
//! log_file = "estimator.log"
//!
//! [store]
//! backend = "sqlite"
//! connection_string = "estimator.db"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// File read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "estimator.toml";

/// Overrides `store.connection_string`.
pub const STORE_ENV_VAR: &str = "ESTIMATOR_STORE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Draft store backends compiled into this binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
}

/// File the wizard keeps its draft in when `[store]` does not name one.
pub const DEFAULT_DRAFT_DATABASE: &str = "estimator.db";

fn default_connection_string() -> String {
    DEFAULT_DRAFT_DATABASE.to_string()
}

/// The `[store]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,
    /// For SQLite, a file path (created if missing), `:memory:`, or a
    /// `sqlite:` URL.
    #[serde(default = "default_connection_string")]
    pub connection_string: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            connection_string: default_connection_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreSettings,
    /// CSV of rate overrides applied on top of the built-in tables.
    pub rates_file: Option<PathBuf>,
    pub debounce_ms: u64,
    pub calculation_delay_ms: u64,
    pub draft_max_age_days: i64,
    /// Ask before continuing a saved draft instead of restoring silently.
    pub confirm_restore: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreSettings::default(),
            rates_file: None,
            debounce_ms: 200,
            calculation_delay_ms: 2500,
            draft_max_age_days: 7,
            confirm_restore: true,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Parses TOML text and validates it.
    pub fn from_toml(
        text: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, or [`DEFAULT_CONFIG_FILE`] when present, or defaults.
    /// The store environment override is applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::read(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::read(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        if let Ok(connection_string) = std::env::var(STORE_ENV_VAR) {
            config.apply_store_override(connection_string);
        }

        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config file");
        Self::from_toml(&text, path)
    }

    fn apply_store_override(
        &mut self,
        connection_string: String,
    ) {
        if !connection_string.trim().is_empty() {
            debug!(%connection_string, "store overridden from environment");
            self.store.connection_string = connection_string;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.store.connection_string.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "store.connection_string must not be empty".to_string(),
            ));
        }
        if self.draft_max_age_days <= 0 || TimeDelta::try_days(self.draft_max_age_days).is_none() {
            return Err(ConfigError::Invalid(format!(
                "draft_max_age_days must be a positive number of days, got {}",
                self.draft_max_age_days
            )));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn calculation_delay(&self) -> Duration {
        Duration::from_millis(self.calculation_delay_ms)
    }

    /// Falls back to 7 days if the field was set out of range after loading.
    pub fn draft_max_age(&self) -> TimeDelta {
        TimeDelta::try_days(self.draft_max_age_days)
            .filter(|age| *age > TimeDelta::zero())
            .unwrap_or_else(|| TimeDelta::days(7))
    }
}
