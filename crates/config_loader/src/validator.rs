//! 配置校验模块
//!
//! 校验规则：
//! - storage.bucket 必填
//! - notify.channel_timeout_secs > 0
//! - 已填写的 URL 必须是 http(s)
//!
//! Channel credentials are not checked here: every adapter resolves its
//! own section at send time.

use contracts::{ConfigError, ReporterConfig};

/// Upper bound for a single channel send
const MAX_CHANNEL_TIMEOUT_SECS: u64 = 900;

/// 校验 ReporterConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &ReporterConfig) -> Result<(), ConfigError> {
    validate_storage(config)?;
    validate_notify(config)?;
    validate_urls(config)?;
    Ok(())
}

fn validate_storage(config: &ReporterConfig) -> Result<(), ConfigError> {
    let bucket = config.storage.bucket.as_deref().map(str::trim);
    if bucket.is_none_or(str::is_empty) {
        return Err(ConfigError::validation(
            "storage.bucket",
            "bucket name is required (S3_BUCKET_NAME)",
        ));
    }
    Ok(())
}

fn validate_notify(config: &ReporterConfig) -> Result<(), ConfigError> {
    let timeout = config.notify.channel_timeout_secs;
    if timeout == 0 || timeout > MAX_CHANNEL_TIMEOUT_SECS {
        return Err(ConfigError::validation(
            "notify.channel_timeout_secs",
            format!("must be in 1..={MAX_CHANNEL_TIMEOUT_SECS}, got {timeout}"),
        ));
    }
    Ok(())
}

fn validate_urls(config: &ReporterConfig) -> Result<(), ConfigError> {
    let urls = [
        ("influxdb.url", config.influxdb.url.as_deref()),
        ("teams.webhook_url", config.teams.webhook_url.as_deref()),
    ];
    for (field, url) in urls {
        let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
            continue;
        };
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::validation(
                field,
                format!("'{url}' is not an http(s) URL"),
            ));
        }
    }
    Ok(())
}
