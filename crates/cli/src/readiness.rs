//! Channel readiness checks shared by `validate` and `info`.
//!
//! Reports which requested channels are unknown or missing settings. Only
//! setting names are reported, never their values.

use contracts::ReporterConfig;
use dispatcher::channels::{BUILTIN, INFLUXDB, LOG, SMTP, TEAMS};
use dispatcher::{ChannelRegistry, Resolution};
use reports::DateLayout;
use serde::Serialize;

/// Readiness of one built-in channel
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChannelStatus {
    pub name: String,
    pub requested: bool,
    pub ready: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<&'static str>,
}

/// Settings a built-in channel still needs; `None` for unknown names
pub fn missing_settings(config: &ReporterConfig, channel: &str) -> Option<Vec<&'static str>> {
    let missing = match channel {
        INFLUXDB => config.influxdb.resolve().err(),
        SMTP => config.smtp.resolve().err(),
        TEAMS => config.teams.resolve().err(),
        LOG => None,
        _ => return None,
    };
    Some(missing.map(|m| m.0).unwrap_or_default())
}

/// Resolve the configured channel list against the built-in channels
pub fn resolve_requested(config: &ReporterConfig) -> anyhow::Result<Resolution> {
    // only names are resolved here, the date is never sent
    let registry = ChannelRegistry::with_builtin(config, DateLayout::yesterday().date())?;
    Ok(registry.resolve(config.notify.channel_names().as_slice()))
}

/// Status of every built-in channel, requested or not
pub fn channel_statuses(config: &ReporterConfig) -> Vec<ChannelStatus> {
    let requested = config.notify.channel_names();
    BUILTIN
        .into_iter()
        .map(|name| {
            let missing = missing_settings(config, name).unwrap_or_default();
            ChannelStatus {
                name: name.to_string(),
                requested: requested.iter().any(|r| r == name),
                ready: missing.is_empty(),
                missing,
            }
        })
        .collect()
}

/// Non-fatal problems with the requested channel list
pub fn channel_warnings(config: &ReporterConfig, resolution: &Resolution) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.notify.channel_names().is_empty() {
        warnings.push("No notification channels requested (NOTIFY_METHODS is empty)".to_string());
    }

    for name in &resolution.unknown {
        warnings.push(format!("Unknown channel '{name}' will be skipped"));
    }

    for name in &resolution.duplicates {
        warnings.push(format!("Channel '{name}' is listed more than once, it is sent once"));
    }

    for name in resolution.names() {
        if let Some(missing) = missing_settings(config, name).filter(|m| !m.is_empty()) {
            warnings.push(format!(
                "Channel '{name}' will fail, missing settings: {}",
                missing.join(", ")
            ));
        }
    }

    warnings
}
