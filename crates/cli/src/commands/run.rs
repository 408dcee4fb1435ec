//! `run` command implementation.

use anyhow::{Context, Result};
use tracing::{info, warn};

use contracts::{parse_channel_list, ReportSource, ReporterConfig};
use dispatcher::{ChannelRegistry, Dispatcher, DispatcherConfig, Invocation};
use observability::MetricsTextfile;
use reports::{DateLayout, ReportGenerator};

use crate::cli::RunArgs;

/// Execute the `run` command
pub async fn run_report(args: &RunArgs) -> Result<()> {
    let metrics = args
        .metrics_file
        .as_deref()
        .map(MetricsTextfile::install)
        .transpose()?;

    let result = execute(args).await;
    if let Some(metrics) = &metrics {
        // 指标写入失败不影响任务结果
        if let Err(e) = metrics.write() {
            warn!(error = %e, path = %metrics.path().display(), "Failed to write metrics file");
        }
    }
    result
}

async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    apply_overrides(&mut config, args);
    config_loader::validate(&config).context("Invalid configuration")?;

    let bucket = config
        .storage
        .bucket
        .clone()
        .context("storage.bucket is not set")?;
    let layout = args.date.map(DateLayout::new).unwrap_or_else(DateLayout::yesterday);
    let channels = config.notify.channel_names();

    info!(
        bucket = %bucket,
        date = %layout.display_date(),
        channels = ?channels,
        timeout_secs = config.notify.channel_timeout_secs,
        "Configuration loaded"
    );

    let client = connect_storage(&config).await?;
    let generator = ReportGenerator::new(client, bucket).for_date(layout.date());

    // Dry run - generate only and print the report
    if args.dry_run {
        info!("Dry run mode - notifications are skipped");
        let report = generator
            .generate()
            .await
            .context("Report generation failed")?;
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
        return Ok(());
    }

    if channels.is_empty() {
        warn!("No notification channels requested, the report will only be generated");
    }

    let registry = ChannelRegistry::with_builtin(&config, layout.date())?;
    let dispatcher = Dispatcher::new(registry, DispatcherConfig::from_notify(&config.notify));

    let summary = Invocation::new(&generator, &dispatcher, channels)
        .run()
        .await
        .context("Backup report run failed")?;

    let snapshot = summary.dispatch.snapshot();
    info!(
        report_id = summary.report.id,
        services = summary.report.services.len(),
        total = summary.report.total_count(),
        channels = snapshot.channels,
        elapsed_ms = snapshot.elapsed.as_millis() as u64,
        "Backup report delivered"
    );

    Ok(())
}

/// CLI flags win over file and environment
fn apply_overrides(config: &mut ReporterConfig, args: &RunArgs) {
    if let Some(ref channels) = args.channels {
        info!(channels = ?parse_channel_list(channels), "Overriding channels from CLI");
        config.notify.methods = channels.clone();
    }
    if let Some(ref bucket) = args.bucket {
        info!(bucket = %bucket, "Overriding bucket from CLI");
        config.storage.bucket = Some(bucket.clone());
    }
    if let Some(timeout) = args.timeout {
        info!(timeout_secs = timeout, "Overriding channel timeout from CLI");
        config.notify.channel_timeout_secs = timeout;
    }
}

#[cfg(feature = "s3")]
async fn connect_storage(config: &ReporterConfig) -> Result<storage::S3BucketClient> {
    let settings = storage::S3Settings {
        region: config.storage.region.clone(),
        role_arn: config.storage.role_arn.clone(),
    };
    Ok(storage::S3BucketClient::connect(&settings).await)
}

#[cfg(not(feature = "s3"))]
async fn connect_storage(_config: &ReporterConfig) -> Result<storage::InMemoryBucket> {
    anyhow::bail!("built without S3 support, rebuild with the `s3` feature")
}
