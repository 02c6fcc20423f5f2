//! Configuration management for tanklog
//!
//! Config stored at: ~/.config/tanklog/config.json

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tanklog_types::{
    ConfigError, OutputFormat, Result, DEFAULT_COMPARTMENT_COUNT,
    DEFAULT_MAX_PER_COMPARTMENT_LITERS,
};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the state snapshot (default: platform data dir)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Compartments given to trailers added without an explicit count
    #[serde(default = "default_compartment_count")]
    pub default_compartment_count: u32,

    /// Capacity given to trailers added without an explicit value
    #[serde(default = "default_max_per_compartment_liters")]
    pub default_max_per_compartment_liters: f64,
}

fn default_compartment_count() -> u32 {
    DEFAULT_COMPARTMENT_COUNT
}

fn default_max_per_compartment_liters() -> f64 {
    DEFAULT_MAX_PER_COMPARTMENT_LITERS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            output_format: OutputFormat::default(),
            default_compartment_count: default_compartment_count(),
            default_max_per_compartment_liters: default_max_per_compartment_liters(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("tanklog");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("tanklog");
        Ok(data_dir)
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tanklog Configuration")?;
        writeln!(f, "=====================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Data dir:             {}",
            self.data_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:        {}", self.output_format)?;
        writeln!(f, "Compartments:         {}", self.default_compartment_count)?;
        writeln!(
            f,
            "Liters/compartment:   {}",
            self.default_max_per_compartment_liters
        )?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:          {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_compartment_count, 6);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"output_format": "json"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.default_max_per_compartment_liters, 7200.0);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub").join("config.json");
        let config = Config {
            data_dir: Some(dir.path().join("data")),
            default_compartment_count: 4,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
        assert_eq!(config.data_dir().unwrap(), dir.path().join("data"));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "output_format = json").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(tanklog_types::Error::Config(ConfigError::ParseError(_)))
        ));
    }
}
