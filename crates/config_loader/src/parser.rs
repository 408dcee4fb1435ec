//! 配置解析模块
//!
//! 支持 TOML (主要) 和 JSON 格式。
//! 顶层键先对照已知段落检查，拼错的 `[infuxdb]` 会直接报错，而不是被当作缺省值吞掉。

use std::fmt;
use std::path::Path;

use contracts::{ConfigError, ReporterConfig};

/// Top-level keys a reporter config may contain
pub const TOP_LEVEL_KEYS: [&str; 6] = ["version", "notify", "storage", "influxdb", "smtp", "teams"];

/// Origin label for configs that did not come from a file
pub const INLINE_ORIGIN: &str = "<inline>";

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// 从文件路径推断格式，错误信息带上文件名
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ConfigError::parse(format!(
                "{}: cannot determine file format, expected a .toml or .json extension",
                path.display()
            ))
        })?;

        Self::from_extension(ext).ok_or_else(|| {
            ConfigError::parse(format!(
                "{}: unsupported config format .{ext}, expected .toml or .json",
                path.display()
            ))
        })
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml => f.write_str("TOML"),
            Self::Json => f.write_str("JSON"),
        }
    }
}

/// Parse a reporter config. `origin` names the source (file path or [`INLINE_ORIGIN`])
/// in every error.
pub fn parse(
    content: &str,
    format: ConfigFormat,
    origin: &str,
) -> Result<ReporterConfig, ConfigError> {
    let keys: Vec<String> = match format {
        ConfigFormat::Toml => toml::from_str::<toml::Table>(content)
            .map_err(|e| syntax_error(format, origin, e))?
            .into_iter()
            .map(|(key, _)| key)
            .collect(),
        ConfigFormat::Json => {
            serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(content)
                .map_err(|e| syntax_error(format, origin, e))?
                .into_iter()
                .map(|(key, _)| key)
                .collect()
        }
    };
    check_top_level(&keys, origin)?;

    match format {
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| syntax_error(format, origin, e))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| syntax_error(format, origin, e))
        }
    }
}

fn syntax_error<E>(format: ConfigFormat, origin: &str, e: E) -> ConfigError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ConfigError::Parse {
        message: format!("{origin}: {format} parse error: {e}"),
        source: Some(Box::new(e)),
    }
}

// 未知段落一次全部列出
fn check_top_level(keys: &[String], origin: &str) -> Result<(), ConfigError> {
    let unknown: Vec<&str> = keys
        .iter()
        .map(String::as_str)
        .filter(|key| !TOP_LEVEL_KEYS.contains(key))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    Err(ConfigError::parse(format!(
        "{origin}: unknown section(s) {}, expected one of: {}",
        unknown.join(", "),
        TOP_LEVEL_KEYS.join(", ")
    )))
}
