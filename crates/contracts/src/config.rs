//! ReporterConfig - Config Loader output
//!
//! One explicit configuration value built at process start and passed by
//! reference to the generator, the channel registry and the driver.
//! Channel sections are all optional: each adapter resolves its own section
//! on every send and reports what is missing.

use serde::{Deserialize, Serialize};

/// Setting names, as read from the environment
pub mod keys {
    pub const NOTIFY_METHODS: &str = "NOTIFY_METHODS";
    pub const NOTIFY_TIMEOUT_SECS: &str = "NOTIFY_TIMEOUT_SECS";
    pub const S3_BUCKET_NAME: &str = "S3_BUCKET_NAME";
    pub const AWS_ROLE_ARN: &str = "AWS_ROLE_ARN";
    pub const AWS_REGION: &str = "AWS_REGION";
    pub const INFLUXDB_URL: &str = "INFLUXDB_URL";
    pub const INFLUXDB_TOKEN: &str = "INFLUXDB_TOKEN";
    pub const INFLUXDB_ORG: &str = "INFLUXDB_ORG";
    pub const INFLUXDB_BUCKET: &str = "INFLUXDB_BUCKET";
    pub const SMTP_HOST: &str = "SMTP_HOST";
    pub const SMTP_PORT: &str = "SMTP_PORT";
    pub const SMTP_USER: &str = "SMTP_USER";
    pub const SMTP_PASS: &str = "SMTP_PASS";
    pub const SMTP_FROM_EMAIL: &str = "SMTP_FROM_EMAIL";
    pub const SMTP_FROM_NAME: &str = "SMTP_FROM_NAME";
    pub const SMTP_TO_EMAIL: &str = "SMTP_TO_EMAIL";
    pub const TEAMS_WEBHOOK_URL: &str = "TEAMS_WEBHOOK_URL";
}

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete job configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReporterConfig {
    #[serde(default)]
    pub version: ConfigVersion,

    /// Channel selection and dispatch deadline
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Bucket to scan
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub influxdb: InfluxDbConfig,

    #[serde(default)]
    pub smtp: SmtpConfig,

    #[serde(default)]
    pub teams: TeamsConfig,
}

/// Which channels to notify and how long each may take
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Comma-separated channel names, e.g. "influxdb,smtp,teams"
    #[serde(default)]
    pub methods: String,

    /// Per-channel send deadline in seconds
    #[serde(default = "default_channel_timeout_secs")]
    pub channel_timeout_secs: u64,
}

fn default_channel_timeout_secs() -> u64 {
    30
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            methods: String::new(),
            channel_timeout_secs: default_channel_timeout_secs(),
        }
    }
}

impl NotifyConfig {
    /// Requested channel names, trimmed, empties dropped
    pub fn channel_names(&self) -> Vec<String> {
        parse_channel_list(&self.methods)
    }
}

/// Parse a comma-separated channel list
///
/// Whitespace around each entry is trimmed and empty entries are dropped.
/// Order and duplicates are preserved; resolution happens later.
pub fn parse_channel_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Object storage location and credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket holding the backup artifacts
    #[serde(default)]
    pub bucket: Option<String>,

    /// Role to assume before listing (optional)
    #[serde(default)]
    pub role_arn: Option<String>,

    /// Region override (optional)
    #[serde(default)]
    pub region: Option<String>,
}

/// InfluxDB v2 write endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfluxDbConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub org: Option<String>,
    #[serde(default)]
    pub bucket: Option<String>,
}

/// SMTP relay and envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmtpConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub from_email: Option<String>,
    #[serde(default)]
    pub from_name: Option<String>,
    /// Recipient addresses
    #[serde(default)]
    pub to: Vec<String>,
}

/// Teams incoming webhook
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamsConfig {
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Names of settings that are absent or blank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingSettings(pub Vec<&'static str>);

/// Resolved InfluxDB settings
#[derive(Debug, Clone, Copy)]
pub struct InfluxDbSettings<'a> {
    pub url: &'a str,
    pub token: &'a str,
    pub org: &'a str,
    pub bucket: &'a str,
}

/// Resolved SMTP settings
#[derive(Debug, Clone, Copy)]
pub struct SmtpSettings<'a> {
    pub host: &'a str,
    pub port: u16,
    pub username: &'a str,
    pub password: &'a str,
    pub from_email: &'a str,
    pub from_name: Option<&'a str>,
    pub recipients: &'a [String],
}

/// Resolved Teams settings
#[derive(Debug, Clone, Copy)]
pub struct TeamsSettings<'a> {
    pub webhook_url: &'a str,
}

impl InfluxDbConfig {
    pub fn resolve(&self) -> Result<InfluxDbSettings<'_>, MissingSettings> {
        let mut required = Required::default();
        let settings = InfluxDbSettings {
            url: required.text(&self.url, keys::INFLUXDB_URL),
            token: required.text(&self.token, keys::INFLUXDB_TOKEN),
            org: required.text(&self.org, keys::INFLUXDB_ORG),
            bucket: required.text(&self.bucket, keys::INFLUXDB_BUCKET),
        };
        required.finish(settings)
    }
}

impl SmtpConfig {
    pub fn resolve(&self) -> Result<SmtpSettings<'_>, MissingSettings> {
        let mut required = Required::default();
        let port = match self.port {
            Some(port) => port,
            None => {
                required.missing.push(keys::SMTP_PORT);
                0
            }
        };
        if self.to.iter().all(|r| r.trim().is_empty()) {
            required.missing.push(keys::SMTP_TO_EMAIL);
        }
        let settings = SmtpSettings {
            host: required.text(&self.host, keys::SMTP_HOST),
            port,
            username: required.text(&self.username, keys::SMTP_USER),
            password: required.text(&self.password, keys::SMTP_PASS),
            from_email: required.text(&self.from_email, keys::SMTP_FROM_EMAIL),
            from_name: non_blank(&self.from_name),
            recipients: &self.to,
        };
        required.finish(settings)
    }
}

impl TeamsConfig {
    pub fn resolve(&self) -> Result<TeamsSettings<'_>, MissingSettings> {
        let mut required = Required::default();
        let settings = TeamsSettings {
            webhook_url: required.text(&self.webhook_url, keys::TEAMS_WEBHOOK_URL),
        };
        required.finish(settings)
    }
}

#[derive(Default)]
struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    fn text<'a>(&mut self, value: &'a Option<String>, key: &'static str) -> &'a str {
        match non_blank(value) {
            Some(v) => v,
            None => {
                self.missing.push(key);
                ""
            }
        }
    }

    fn finish<T>(self, settings: T) -> Result<T, MissingSettings> {
        if self.missing.is_empty() {
            Ok(settings)
        } else {
            Err(MissingSettings(self.missing))
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
