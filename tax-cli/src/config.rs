//! Application configuration.
//!
//! Read from an optional TOML file. Every key may be omitted; command line
//! flags override whatever the file sets.
//!
//! ```toml
//! tax_year = 2025
//! templates_dir = "templates"
//! output_dir = "out"
//! template_timeout_secs = 30
//! log_level = "info"
//! log_file = "f1-tax.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TAX_YEAR: i32 = 2025;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Year the `days` command counts. Other commands use the filing data's
    /// own year and warn when it differs.
    pub tax_year: i32,
    /// Directory holding the blank form templates.
    pub templates_dir: PathBuf,
    /// Directory prepared packages are written to.
    pub output_dir: PathBuf,
    pub template_timeout_secs: u64,
    /// Level or full filter directive; `RUST_LOG` wins when set.
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tax_year: DEFAULT_TAX_YEAR,
            templates_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("."),
            template_timeout_secs: 30,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

/// Values given on the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub tax_year: Option<i32>,
    pub templates_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub template_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The file at `path` when given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn apply(
        mut self,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        if let Some(year) = overrides.tax_year {
            self.tax_year = year;
        }
        if let Some(dir) = overrides.templates_dir {
            self.templates_dir = dir;
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if let Some(secs) = overrides.template_timeout_secs {
            self.template_timeout_secs = secs;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if overrides.log_file.is_some() {
            self.log_file = overrides.log_file;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn template_timeout(&self) -> Duration {
        Duration::from_secs(self.template_timeout_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.template_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "template_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Validation("log_level must not be empty".to_string()));
        }
        Ok(())
    }
}
