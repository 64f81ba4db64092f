//! Configuration management for equiptrack.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "equiptrack";

/// Default seed document, relative to the working directory.
const DEFAULT_SEED_SOURCE: &str = "data.json";

/// Prefix of configuration environment variables.
const ENV_PREFIX: &str = "EQUIPTRACK_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `EQUIPTRACK_`, sections separated
///    by `__`, e.g. `EQUIPTRACK_SEED__SOURCE`)
/// 2. TOML config file at `~/.config/equiptrack/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed document configuration.
    pub seed: SeedConfig,
    /// Filter configuration.
    pub filter: FilterConfig,
    /// Display configuration.
    pub display: DisplayConfig,
}

/// Where the initial collection comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// File path or `http(s)://` URL of the seed document.
    pub source: String,
    /// Timeout for fetching a remote seed document, in seconds.
    pub timeout_secs: u64,
}

/// Filter-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Sites offered by the site filter.
    pub sites: Vec<String>,
}

/// How the table is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show every column instead of the summary.
    pub show_details: bool,
    /// Ask before deleting a record.
    pub confirm_deletes: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SEED_SOURCE.to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            sites: default_sites(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_details: false,
            confirm_deletes: true,
        }
    }
}

/// Sites known to the organisation.
fn default_sites() -> Vec<String> {
    [
        "Connecta 80",
        "Cota",
        "Medellin",
        "Cali",
        "Bucaramanga",
        "235",
        "zona franca",
        "duitama",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.seed.source.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "seed source must not be empty".to_string(),
            });
        }

        if self.seed.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "timeout_secs must be greater than 0".to_string(),
            });
        }

        if let Some(blank) = self.filter.sites.iter().position(|s| s.trim().is_empty()) {
            return Err(Error::ConfigValidation {
                message: format!("site #{} is blank", blank + 1),
            });
        }

        Ok(())
    }

    /// Seed location, preferring an explicit override.
    #[must_use]
    pub fn seed_source<'a>(&'a self, override_source: Option<&'a str>) -> &'a str {
        override_source.unwrap_or(&self.seed.source)
    }

    /// Get the seed fetch timeout as a Duration.
    #[must_use]
    pub fn seed_timeout(&self) -> Duration {
        Duration::from_secs(self.seed.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.seed.source, "data.json");
        assert_eq!(config.seed.timeout_secs, 10);
        assert!(!config.display.show_details);
        assert!(config.display.confirm_deletes);
    }

    #[test]
    fn test_default_sites() {
        let filter = FilterConfig::default();
        assert_eq!(filter.sites.len(), 8);
        assert!(filter.sites.contains(&"Cota".to_string()));
        assert!(filter.sites.contains(&"zona franca".to_string()));
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.seed.timeout_secs = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("timeout_secs"));
    }

    #[test]
    fn test_validate_empty_source() {
        let mut config = Config::default();
        config.seed.source = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("seed source"));
    }

    #[test]
    fn test_validate_blank_site() {
        let mut config = Config::default();
        config.filter.sites.push(String::new());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("site #9"));
    }

    #[test]
    fn test_seed_source_override() {
        let config = Config::default();
        assert_eq!(config.seed_source(None), "data.json");
        assert_eq!(config.seed_source(Some("other.json")), "other.json");
    }

    #[test]
    fn test_seed_timeout() {
        let config = Config::default();
        assert_eq!(config.seed_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("equiptrack"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), Config::default());
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[seed]
source = "https://intranet.example/data.json"

[filter]
sites = ["Cota", "Cali"]

[display]
show_details = true
"#
        )
        .unwrap();

        let config = Config::load_from(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.seed.source, "https://intranet.example/data.json");
        assert_eq!(config.seed.timeout_secs, 10);
        assert_eq!(config.filter.sites, vec!["Cota", "Cali"]);
        assert!(config.display.show_details);
        assert!(config.display.confirm_deletes);
    }

    #[test]
    fn test_load_file_sections_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[seed]
source = "remote.json"
timeout_secs = 3

[display]
confirm_deletes = false
"#
        )
        .unwrap();

        let config = Config::load_from(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.seed.source, "remote.json");
        assert_eq!(config.seed_timeout(), Duration::from_secs(3));
        assert!(!config.display.confirm_deletes);
        assert_eq!(config.filter, FilterConfig::default());
    }

    #[test]
    fn test_load_invalid_file_fails_validation() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[seed]\ntimeout_secs = 0").unwrap();

        let err = Config::load_from(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("timeout_secs"));
        assert!(json.contains("confirm_deletes"));
    }

    #[test]
    fn test_display_config_deserialize() {
        let json = r#"{"show_details": true}"#;
        let display: DisplayConfig = serde_json::from_str(json).unwrap();
        assert!(display.show_details);
        assert!(display.confirm_deletes);
    }
}
