//! # Configuration State
//!
//! Portal configuration loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  highest   MARGEM_* environment variables                              │
//! │            e.g. MARGEM_DISPLAY_DECIMALS=3                               │
//! │                 MARGEM_ALIQUOTS__INTERSTATE_RATE=7                      │
//! │                 MARGEM_ALIQUOTS__INTERNAL__SP=18                        │
//! │     │                                                                   │
//! │     ▼      margem.toml ($MARGEM_CONFIG, or the platform config dir)    │
//! │     │                                                                   │
//! │  lowest    Defaults (this file)                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example `margem.toml`
//! ```toml
//! display_decimals = 2
//! currency_symbol = "R$"
//!
//! [aliquots]
//! interstate_rate = 12
//!
//! [aliquots.internal]
//! SP = 18
//! RJ = 20
//! MG = 18
//! ```
//!
//! ## Thread Safety
//! Read-only after load, shared behind an `Arc`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ::config::builder::DefaultState;
use ::config::{ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use margem_core::DEFAULT_INTERSTATE_RATE;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "MARGEM_CONFIG";

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "margem.toml";

/// Largest `display_decimals` accepted.
pub const MAX_DISPLAY_DECIMALS: u8 = 6;

/// Portal configuration.
///
/// Field names are snake_case both in TOML and in the `get_config` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Decimal places used when writing computed values back into fields.
    pub display_decimals: u8,

    /// Currency symbol used in the formatted result summary.
    pub currency_symbol: String,

    /// ICMS rates used by the DIFAL screen.
    pub aliquots: AliquotTable,
}

/// ICMS aliquots, percent units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliquotTable {
    /// Interstate rate pre-filled on a fresh DIFAL form.
    pub interstate_rate: f64,

    /// Internal rate per destination state (UF code → rate).
    pub internal: BTreeMap<String, f64>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        PortalConfig {
            display_decimals: 2,
            currency_symbol: "R$".to_string(),
            aliquots: AliquotTable::default(),
        }
    }
}

impl Default for AliquotTable {
    /// The internal table is empty: rates change by state law and are
    /// supplied by the deployment.
    fn default() -> Self {
        AliquotTable {
            interstate_rate: DEFAULT_INTERSTATE_RATE,
            internal: BTreeMap::new(),
        }
    }
}

impl AliquotTable {
    /// Looks up the internal rate of a state; the code is case-insensitive.
    pub fn internal_rate(&self, uf: &str) -> Option<f64> {
        self.internal.get(&uf.trim().to_uppercase()).copied()
    }
}

impl PortalConfig {
    /// Loads configuration from the optional TOML file and `MARGEM_*` env vars.
    ///
    /// A missing file is not an error; a present but malformed one is.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();

        match config_file_path() {
            Some(path) => {
                info!(path = %path.display(), "Reading configuration file");
                builder = builder.add_source(File::from(path.as_path()).required(false));
            }
            None => debug!("No configuration directory available"),
        }

        builder = builder.add_source(
            Environment::with_prefix("MARGEM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Self::from_builder(builder)
    }

    /// Loads configuration from a TOML document only.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Self::from_builder(
            ::config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    /// Loads configuration from a TOML file, which must exist.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_builder(::config::Config::builder().add_source(File::from(path)))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: PortalConfig = builder.build()?.try_deserialize()?;
        config.normalized().validated()
    }

    /// Upper-cases UF keys so lookups ignore the case used in the source.
    fn normalized(mut self) -> Self {
        self.aliquots.internal = self
            .aliquots
            .internal
            .into_iter()
            .map(|(uf, rate)| (uf.trim().to_uppercase(), rate))
            .collect();
        self
    }

    /// Checks ranges; every rate must lie strictly between 0 and 100.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.display_decimals > MAX_DISPLAY_DECIMALS {
            return Err(ConfigError::InvalidValue {
                field: "display_decimals".to_string(),
                reason: format!("must be at most {}", MAX_DISPLAY_DECIMALS),
            });
        }

        check_rate("aliquots.interstate_rate", self.aliquots.interstate_rate)?;

        for (uf, rate) in &self.aliquots.internal {
            if uf.len() != 2 || !uf.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("aliquots.internal.{}", uf),
                    reason: "state code must be two letters".to_string(),
                });
            }
            check_rate(&format!("aliquots.internal.{}", uf), *rate)?;
        }

        Ok(self)
    }
}

fn check_rate(field: &str, rate: f64) -> Result<(), ConfigError> {
    if rate.is_finite() && rate > 0.0 && rate < 100.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("rate {} is outside (0, 100)", rate),
        })
    }
}

/// Resolves the config file: `MARGEM_CONFIG`, else `<config dir>/margem.toml`.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/br.margem.portal/margem.toml`
/// - **Windows**: `%APPDATA%\margem\portal\config\margem.toml`
/// - **Linux**: `~/.config/portal/margem.toml`
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    ProjectDirs::from("br", "margem", "portal").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}
