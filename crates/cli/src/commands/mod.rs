//! Command implementations.

mod info;
mod run;
mod validate;

pub use info::run_info;
pub use run::run_report;
pub use validate::run_validate;

use std::path::Path;

use anyhow::{Context, Result};
use contracts::ReporterConfig;
use tracing::info;

/// Load the optional file, then overlay the process environment
fn load_config(path: Option<&Path>) -> Result<ReporterConfig> {
    match path {
        Some(path) => {
            info!(config = %path.display(), "Loading configuration");
            if !path.exists() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
        }
        None => info!("No configuration file, using environment only"),
    }

    config_loader::ConfigLoader::load(path).with_context(|| match path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to load config from environment".to_string(),
    })
}
