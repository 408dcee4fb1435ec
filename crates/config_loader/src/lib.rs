//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Overlay environment variables
//! - Validate job-level settings
//! - Produce one `ReporterConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load(Some(Path::new("reporter.toml"))).unwrap();
//! println!("Channels: {}", config.notify.methods);
//! ```

mod env;
mod parser;
mod validator;

pub use contracts::ReporterConfig;
pub use parser::{ConfigFormat, TOP_LEVEL_KEYS};
pub use validator::validate;

use contracts::ConfigError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files, strings and
/// the environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from an optional file, then the process environment
    ///
    /// Does not validate; call [`validate`] once CLI overrides are applied.
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Malformed numeric environment value
    pub fn load(path: Option<&Path>) -> Result<ReporterConfig, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Same as [`ConfigLoader::load`] with an explicit variable lookup
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<ReporterConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::load_from_path(path)?,
            None => ReporterConfig::default(),
        };
        env::apply(&mut config, lookup)?;
        Ok(config)
    }

    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    /// Parse errors carry the file path.
    pub fn load_from_path(path: &Path) -> Result<ReporterConfig, ConfigError> {
        let format = ConfigFormat::from_path(path)?;
        let content = Self::read_file(path)?;
        parser::parse(&content, format, &path.display().to_string())
    }

    /// Load configuration from string
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<ReporterConfig, ConfigError> {
        parser::parse(content, format, parser::INLINE_ORIGIN)
    }

    /// Serialize ReporterConfig to TOML string
    pub fn to_toml(config: &ReporterConfig) -> Result<String, ConfigError> {
        toml::to_string_pretty(config)
            .map_err(|e| ConfigError::parse(format!("TOML serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ConfigError> {
        Ok(std::fs::read_to_string(path)?)
    }
}
