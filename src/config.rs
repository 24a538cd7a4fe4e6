use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_INPUT_PATH, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE, DEFAULT_LOG_FILTER, DEFAULT_OUTPUT_PATH,
};
use crate::error::{PipelineError, Result};
use crate::pipeline::processing::validate::NumericPolicy;

/// Settings read from `pipeline.toml`. Every section and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub numeric_policy: NumericPolicy,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the rolling JSON log files
    pub directory: PathBuf,
    pub file_name: String,
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIR),
            file_name: DEFAULT_LOG_FILE.to_string(),
            default_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Where to write a Prometheus text snapshot after each run
    pub snapshot_path: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml(&config_content)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
