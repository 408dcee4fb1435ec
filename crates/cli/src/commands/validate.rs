//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::ReporterConfig;

use crate::cli::ValidateArgs;
use crate::readiness::{channel_warnings, resolve_requested};

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    config_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    bucket: String,
    requested_channels: Vec<String>,
    resolved_channels: Vec<String>,
    channel_timeout_secs: u64,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!("Validating configuration");

    let config_path = args.config.as_ref().map(|p| p.display().to_string());
    let result = match super::load_config(args.config.as_deref()) {
        Ok(config) => validate_config(&config, config_path),
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("{e:#}")),
            warnings: Vec::new(),
            summary: None,
        },
    };

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(config: &ReporterConfig, config_path: Option<String>) -> ValidationResult {
    if let Err(e) = config_loader::validate(config) {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: Vec::new(),
            summary: None,
        };
    }

    let resolution = match resolve_requested(config) {
        Ok(resolution) => resolution,
        Err(e) => {
            return ValidationResult {
                valid: false,
                config_path,
                error: Some(e.to_string()),
                warnings: Vec::new(),
                summary: None,
            }
        }
    };

    ValidationResult {
        valid: true,
        config_path,
        error: None,
        warnings: channel_warnings(config, &resolution),
        summary: Some(ConfigSummary {
            version: format!("{:?}", config.version),
            bucket: config.storage.bucket.clone().unwrap_or_default(),
            requested_channels: config.notify.channel_names(),
            resolved_channels: resolution.names().into_iter().map(String::from).collect(),
            channel_timeout_secs: config.notify.channel_timeout_secs,
        }),
    }
}

fn print_validation_result(result: &ValidationResult) {
    let source = result.config_path.as_deref().unwrap_or("<environment>");

    if result.valid {
        println!("✓ Configuration is valid: {}", source);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Bucket: {}", summary.bucket);
            println!("  Requested channels: {}", summary.requested_channels.join(", "));
            println!("  Resolved channels: {}", summary.resolved_channels.join(", "));
            println!("  Channel timeout: {}s", summary.channel_timeout_secs);
        }

        if !result.warnings.is_empty() {
            println!("\n⚠ Warnings:");
            for warning in &result.warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", source);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
