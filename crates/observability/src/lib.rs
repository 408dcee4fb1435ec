//! # Observability
//!
//! 可观测性模块：Tracing + 指标。
//!
//! ## 功能
//!
//! - Tracing 初始化 (JSON/Pretty/Compact 格式)
//! - 通道发送指标 (`metrics` facade)
//! - 可选的 Prometheus textfile 导出 ([`MetricsTextfile`])
//!
//! Without `MetricsTextfile::install` (or a recorder installed by the
//! embedding host) the counters are no-ops.
//!
//! ## 使用示例
//!
//! ```ignore
//! use observability::{init_with_config, ObservabilityConfig};
//!
//! init_with_config(ObservabilityConfig::default())?;
//! observability::record_channel_success("teams", elapsed);
//! ```

pub mod metrics;
pub mod textfile;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// Re-exports
pub use crate::metrics::{record_channel_failure, record_channel_success, record_dispatch};
pub use crate::textfile::MetricsTextfile;

/// 初始化可观测性（JSON 日志，info 级别）
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::default())
}

/// 可观测性配置
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// 日志格式
    pub log_format: LogFormat,
    /// 默认日志级别 (RUST_LOG 优先)
    pub default_log_level: String,
    /// Ignore RUST_LOG and use `default_log_level` as is
    pub force_level: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            default_log_level: "info".to_string(),
            force_level: false,
        }
    }
}

/// 日志格式
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// JSON 结构化日志
    #[default]
    Json,
    /// 人类可读格式
    Pretty,
    /// 紧凑单行格式
    Compact,
}

/// 使用自定义配置初始化
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = if config.force_level {
        EnvFilter::new(&config.default_log_level)
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level))
    };

    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(log_format = ?config.log_format, "Observability initialized");

    Ok(())
}
