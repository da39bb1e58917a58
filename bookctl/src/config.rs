//! TOML configuration loading and validation.
//!
//! Every section is optional; a missing file at the default path means
//! "use the defaults".

use std::path::{Path, PathBuf};

use bookline::Cents;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub settlement: SettlementConfig,
    pub risk: RiskLimits,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// JSON ledger snapshot, created on first write.
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String {
    "./bookline.json".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    /// Ask before writing settlements. `--force` skips the prompt either way.
    #[serde(default = "default_true")]
    pub confirm: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self { confirm: true }
    }
}

/// Exposure limits in cents; `0` disables a limit.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskLimits {
    #[serde(default = "default_max_liability")]
    pub max_liability_cents: Cents,
    #[serde(default = "default_warn_liability")]
    pub warn_liability_cents: Cents,
    #[serde(default = "default_max_handle")]
    pub max_handle_cents: Cents,
    /// Run the limit checks before accepting a wager.
    #[serde(default = "default_true")]
    pub check_on_place: bool,
}

fn default_max_liability() -> Cents {
    5_000_000
}
fn default_warn_liability() -> Cents {
    2_500_000
}
fn default_max_handle() -> Cents {
    50_000_000
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_liability_cents: default_max_liability(),
            warn_liability_cents: default_warn_liability(),
            max_handle_cents: default_max_handle(),
            check_on_place: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
}

fn default_log_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "audit.jsonl".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            audit_file: default_audit_file(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Load config from `path`, or the defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        if self.store.path.is_empty() {
            return Err(Error::Config("store path must not be empty".into()));
        }
        if self.logging.audit_file.is_empty() {
            return Err(Error::Config("audit_file must not be empty".into()));
        }
        self.risk_config().validate().map_err(Error::Config)
    }

    /// Limits in the form the risk engine takes.
    pub fn risk_config(&self) -> bookline_risk::RiskConfig {
        bookline_risk::RiskConfig {
            max_liability_cents: self.risk.max_liability_cents,
            warn_liability_cents: self.risk.warn_liability_cents,
            max_handle_cents: self.risk.max_handle_cents,
        }
    }

    /// Path to the ledger snapshot.
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.store.path)
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> PathBuf {
        Path::new(&self.logging.dir).join(&self.logging.audit_file)
    }
}
