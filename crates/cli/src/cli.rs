//! CLI argument definitions using clap.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Backup Reporter - daily backup inventory report and notification job
#[derive(Parser, Debug)]
#[command(
    name = "backup-reporter",
    author,
    version,
    about = "Daily backup inventory report",
    long_about = "Counts the backup artifacts each service wrote to the backup bucket \n\
                  for one day and sends the resulting report to the configured \n\
                  notification channels (influxdb, smtp, teams, log)."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "BACKUP_REPORTER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "json",
        global = true,
        env = "BACKUP_REPORTER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the report and notify every requested channel
    Run(RunArgs),

    /// Validate configuration without running
    Validate(ValidateArgs),

    /// Display configuration and channel readiness
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); environment alone is enough
    #[arg(short, long, env = "BACKUP_REPORTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Comma-separated channels, overrides NOTIFY_METHODS
    #[arg(long)]
    pub channels: Option<String>,

    /// Override the backup bucket (S3_BUCKET_NAME)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Report date (YYYY-MM-DD), defaults to yesterday (UTC)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Per-channel send timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the report as JSON and skip notifications
    #[arg(long)]
    pub dry_run: bool,

    /// Write Prometheus metrics to this file when the run ends (textfile collector)
    #[arg(long, env = "BACKUP_REPORTER_METRICS_FILE")]
    pub metrics_file: Option<PathBuf>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, env = "BACKUP_REPORTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, env = "BACKUP_REPORTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    #[default]
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_args() {
        let cli = Cli::try_parse_from([
            "backup-reporter",
            "-v",
            "run",
            "--channels",
            "teams, log",
            "--date",
            "2025-03-14",
            "--timeout",
            "10",
            "--dry-run",
            "--metrics-file",
            "/var/lib/node_exporter/backup_reporter.prom",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.channels.as_deref(), Some("teams, log"));
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(args.timeout, Some(10));
        assert!(args.dry_run);
        assert_eq!(
            args.metrics_file.as_deref(),
            Some(std::path::Path::new("/var/lib/node_exporter/backup_reporter.prom"))
        );
    }

    #[test]
    fn test_rejects_bad_date() {
        let result = Cli::try_parse_from(["backup-reporter", "run", "--date", "14/03/2025"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["backup-reporter", "-q", "-v", "info"]);
        assert!(result.is_err());
    }
}
