//! # Backup Reporter CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证 (文件 → 环境变量 → 命令行参数)
//! - 报告生成与通知分发
//! - 通道就绪状态检查

mod cli;
mod commands;
mod readiness;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_report, run_validate};
use observability::ObservabilityConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging based on CLI options
    init_logging(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Backup Reporter starting"
    );

    // Execute command
    let result = match &cli.command {
        Commands::Run(args) => run_report(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let default_log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        default_log_level: default_log_level.to_string(),
        force_level: cli.quiet || cli.verbose > 0,
    })
}
