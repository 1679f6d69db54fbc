//! Configuration module

use crate::request::CompressionLevel;
use crate::{Error, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the configuration file location
pub const CONFIG_ENV: &str = "SZPACK_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default compression settings
    pub compression: CompressionConfig,
    /// Encryption preferences
    pub encryption: EncryptionConfig,
    /// Location of the 7-Zip binary
    pub executable: ExecutableConfig,
    /// Output handling
    pub output: OutputConfig,
}

/// Compression configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Default compression level (0-9)
    pub default_level: CompressionLevel,
}

/// Encryption configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncryptionConfig {
    /// Also encrypt file names when a password is set
    pub encrypt_headers: bool,
}

impl Default for EncryptionConfig {
    fn default() -> Self {
        Self {
            encrypt_headers: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutableConfig {
    /// Explicit path to 7z; searched on PATH when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Replace an existing archive instead of failing
    pub overwrite: bool,
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = config_dir()
            .ok_or_else(|| Error::Config("Unable to determine config directory".to_string()))?;

        Ok(config_dir.join("szpack").join("config.toml"))
    }

    /// Get default configuration content with examples
    pub fn default_config_content() -> String {
        r#"# szpack configuration file

[compression]
# Default compression level: 0 (store) to 9 (ultra)
default_level = 5

[encryption]
# Encrypt file names as well as contents when a password is given
encrypt_headers = true

[executable]
# Path to the 7-Zip binary. When unset, 7z, 7zz and 7za are searched on PATH.
# path = "/usr/bin/7z"

[output]
# Replace an existing archive instead of refusing to run
overwrite = false
"#
        .to_string()
    }

    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            debug!("Writing default configuration to {:?}", path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, Self::default_config_content())?;
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.compression.default_level.get(), 5);
        assert!(config.encryption.encrypt_headers);
        assert!(config.executable.path.is_none());
        assert!(!config.output.overwrite);
    }

    #[test]
    fn test_default_content_matches_defaults() {
        let config: Config = toml::from_str(&Config::default_config_content()).unwrap();
        let defaults = Config::default();

        assert_eq!(
            config.compression.default_level,
            defaults.compression.default_level
        );
        assert_eq!(
            config.encryption.encrypt_headers,
            defaults.encryption.encrypt_headers
        );
        assert_eq!(config.output.overwrite, defaults.output.overwrite);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [executable]
            path = "/opt/7zip/7zz"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.executable.path,
            Some(PathBuf::from("/opt/7zip/7zz"))
        );
        assert_eq!(config.compression.default_level.get(), 5);
    }

    #[test]
    fn test_out_of_range_level_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[compression]\ndefault_level = 12\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_unreadable_config_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();

        match Config::load_from(temp_dir.path()) {
            Err(Error::Config(message)) => assert!(message.contains("Failed to read config")),
            other => panic!("expected Config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.compression.default_level = CompressionLevel::new(7).unwrap();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(deserialized.compression.default_level.get(), 7);
    }
}
