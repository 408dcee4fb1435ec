//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::ReporterConfig;

use crate::cli::InfoArgs;
use crate::readiness::{channel_statuses, resolve_requested, ChannelStatus};

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    storage: StorageInfo,
    notify: NotifyInfo,
    channels: Vec<ChannelStatus>,
}

#[derive(Serialize)]
struct StorageInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    assume_role: bool,
}

#[derive(Serialize)]
struct NotifyInfo {
    requested: Vec<String>,
    resolved: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unknown: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    duplicates: Vec<String>,
    channel_timeout_secs: u64,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!("Loading configuration info");

    let config = super::load_config(args.config.as_deref())?;
    let info = build_config_info(&config)?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(config: &ReporterConfig) -> Result<ConfigInfo> {
    let resolution = resolve_requested(config)?;

    Ok(ConfigInfo {
        version: format!("{:?}", config.version),
        storage: StorageInfo {
            bucket: config.storage.bucket.clone(),
            region: config.storage.region.clone(),
            assume_role: config.storage.role_arn.is_some(),
        },
        notify: NotifyInfo {
            requested: config.notify.channel_names(),
            resolved: resolution.names().into_iter().map(String::from).collect(),
            unknown: resolution.unknown.clone(),
            duplicates: resolution.duplicates.clone(),
            channel_timeout_secs: config.notify.channel_timeout_secs,
        },
        channels: channel_statuses(config),
    })
}

fn print_config_info(info: &ConfigInfo) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Backup Reporter Configuration                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    // Storage
    println!("🪣 Storage");
    println!("   ├─ Version: {}", info.version);
    println!(
        "   ├─ Bucket: {}",
        info.storage.bucket.as_deref().unwrap_or("(not set)")
    );
    println!(
        "   ├─ Region: {}",
        info.storage.region.as_deref().unwrap_or("(default chain)")
    );
    println!(
        "   └─ Assume role: {}",
        if info.storage.assume_role { "yes" } else { "no" }
    );

    // Requested channels
    let notify = &info.notify;
    println!("\n📨 Notify");
    println!("   ├─ Requested: {}", notify.requested.join(", "));
    println!("   ├─ Resolved: {}", notify.resolved.join(", "));
    if !notify.unknown.is_empty() {
        println!("   ├─ Unknown (skipped): {}", notify.unknown.join(", "));
    }
    if !notify.duplicates.is_empty() {
        println!("   ├─ Duplicates (sent once): {}", notify.duplicates.join(", "));
    }
    println!("   └─ Channel timeout: {}s", notify.channel_timeout_secs);

    // Channel readiness
    println!("\n📡 Channels ({})", info.channels.len());
    for (i, channel) in info.channels.iter().enumerate() {
        let is_last = i == info.channels.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let marker = if channel.requested { "*" } else { " " };
        let state = if channel.ready {
            "ready".to_string()
        } else {
            format!("missing {}", channel.missing.join(", "))
        };
        println!("   {} {}{} ({})", prefix, channel.name, marker, state);
    }

    println!();
}
