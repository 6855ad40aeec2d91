use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use webtools_core::currency::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use webtools_core::password::DEFAULT_LENGTH;

pub const CONFIG_ENV: &str = "WEBTOOLS_CONFIG";
pub const API_URL_ENV: &str = "WEBTOOLS_EXCHANGE_RATE_API_URL";

/// Settings read from `config.toml`. Every field has a default, so a missing
/// file or a partial file is fine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebToolsConfig {
    pub exchange_rate: ExchangeRateConfig,
    pub password: PasswordConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeRateConfig {
    pub base_url: String,
    pub base_currency: String,
    pub timeout_secs: u64,
}

impl Default for ExchangeRateConfig {
    fn default() -> Self {
        ExchangeRateConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            base_currency: "USD".to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl ExchangeRateConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    pub default_length: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        PasswordConfig {
            default_length: DEFAULT_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Decimal places for money in rounded output.
    pub precision: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig { precision: 2 }
    }
}

impl WebToolsConfig {
    /// Resolve and load the configuration.
    ///
    /// Checks in order:
    /// 1. `--config <path>` (must exist)
    /// 2. `WEBTOOLS_CONFIG` (must exist)
    /// 3. `<config dir>/webtools/config.toml` (if present)
    /// 4. Built-in defaults
    ///
    /// `WEBTOOLS_EXCHANGE_RATE_API_URL` then overrides the API base URL.
    pub fn load(explicit: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        let env_path = env::var(CONFIG_ENV).ok().filter(|p| !p.trim().is_empty());
        let mut config = match (explicit, env_path) {
            (Some(path), _) => Self::from_file(Path::new(path))?,
            (None, Some(path)) => Self::from_file(Path::new(&path))?,
            (None, None) => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => {
                    tracing::debug!("no config file found, using defaults");
                    WebToolsConfig::default()
                }
            },
        };

        if let Ok(url) = env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!(%url, "exchange-rate base URL overridden from environment");
                config.exchange_rate.base_url = url;
            }
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
        let config = Self::from_toml(&content)
            .map_err(|e| format!("Failed to parse config '{}': {}", path.display(), e))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// `<platform config dir>/webtools/config.toml`, when the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("webtools").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = WebToolsConfig::from_toml("").unwrap();
        assert_eq!(config, WebToolsConfig::default());
        assert_eq!(config.exchange_rate.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.password.default_length, 16);
        assert_eq!(config.output.precision, 2);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = WebToolsConfig::from_toml(
            r#"
            [exchange_rate]
            timeout_secs = 3

            [output]
            precision = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.exchange_rate.timeout(), Duration::from_secs(3));
        assert_eq!(config.exchange_rate.base_currency, "USD");
        assert_eq!(config.output.precision, 4);
        assert_eq!(config.password, PasswordConfig::default());
    }

    #[test]
    fn test_zero_timeout_is_raised_to_one_second() {
        let config = WebToolsConfig::from_toml("[exchange_rate]\ntimeout_secs = 0").unwrap();
        assert_eq!(config.exchange_rate.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_from_file_reports_path_on_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[password\ndefault_length = 20").unwrap();
        let err = WebToolsConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_from_file_reads_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[password]\ndefault_length = 24").unwrap();
        let config = WebToolsConfig::from_file(file.path()).unwrap();
        assert_eq!(config.password.default_length, 24);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(WebToolsConfig::from_file(&missing).is_err());
    }
}
