//! Configuration file handling.
//!
//! `config.json` lives under the platform config directory unless
//! `FOLLOWUP_CONFIG` points elsewhere. A missing file yields defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::DEFAULT_FREQUENCY_DAYS;

const APP_NAME: &str = "followup";
const ENV_CONFIG: &str = "FOLLOWUP_CONFIG";
const ENV_DATA: &str = "FOLLOWUP_DATA";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frequency given to contacts whose data has none.
    pub default_frequency_days: u32,
    pub data_file: Option<PathBuf>,
    /// tracing env-filter directive
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_frequency_days: DEFAULT_FREQUENCY_DAYS,
            data_file: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load from `FOLLOWUP_CONFIG` or the default location.
    pub fn load() -> Result<Self> {
        let path = match env::var_os(ENV_CONFIG) {
            Some(p) => PathBuf::from(p),
            None => Self::default_path()?,
        };
        let mut config = Self::load_from(&path)?;
        if let Some(data) = env::var_os(ENV_DATA) {
            config.data_file = Some(PathBuf::from(data));
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        if config.default_frequency_days == 0 {
            anyhow::bail!("default_frequency_days must be positive in {}", path.display());
        }
        Ok(config)
    }

    /// Configured data file, or `<data dir>/followup/data.json`.
    pub fn data_path(&self) -> Result<PathBuf> {
        match &self.data_file {
            Some(path) => Ok(path.clone()),
            None => {
                let data_dir = dirs::data_dir()
                    .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
                Ok(data_dir.join(APP_NAME).join("data.json"))
            }
        }
    }

    fn default_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_frequency_days, 30);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"default_frequency_days": 14, "data_file": "/tmp/crm.json"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.default_frequency_days, 14);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.data_path().unwrap(), PathBuf::from("/tmp/crm.json"));
    }

    #[test]
    fn test_zero_frequency_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"default_frequency_days": 0}"#).unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
