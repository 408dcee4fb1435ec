//! Layered error definitions
//!
//! Categorized by source: config / channel / generation

use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration parse error
    #[error("config parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    Validation { field: String, message: String },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Create configuration parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure of a single notification channel
///
/// Always recorded by the dispatcher, never fatal to the other channels.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Required settings are absent or invalid
    #[error("channel '{channel}' configuration error: {message}")]
    Configuration { channel: String, message: String },

    /// Network or protocol failure talking to the endpoint
    #[error("channel '{channel}' transport error: {message}")]
    Transport { channel: String, message: String },

    /// Endpoint answered with a non-success status
    #[error("channel '{channel}' upstream returned status {status}: {body}")]
    UpstreamStatus {
        channel: String,
        status: u16,
        body: String,
    },

    /// Send did not complete within the dispatch deadline
    #[error("channel '{channel}' timed out after {timeout_ms}ms")]
    Timeout { channel: String, timeout_ms: u64 },

    /// Send task terminated abnormally
    #[error("channel '{channel}' aborted: {message}")]
    Aborted { channel: String, message: String },
}

impl ChannelError {
    /// Create configuration error
    pub fn configuration(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create configuration error listing missing settings
    pub fn missing_settings(channel: impl Into<String>, missing: &[&str]) -> Self {
        Self::configuration(channel, format!("missing settings: {}", missing.join(", ")))
    }

    /// Create transport error
    pub fn transport(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create upstream status error
    pub fn upstream_status(channel: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::UpstreamStatus {
            channel: channel.into(),
            status,
            body: body.into(),
        }
    }

    /// Name of the channel that failed
    pub fn channel(&self) -> &str {
        match self {
            Self::Configuration { channel, .. }
            | Self::Transport { channel, .. }
            | Self::UpstreamStatus { channel, .. }
            | Self::Timeout { channel, .. }
            | Self::Aborted { channel, .. } => channel,
        }
    }

    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Transport { .. } => "transport",
            Self::UpstreamStatus { .. } => "upstream_status",
            Self::Timeout { .. } => "timeout",
            Self::Aborted { .. } => "aborted",
        }
    }
}

/// The report could not be produced
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Listing the storage location failed
    #[error("failed to list '{prefix}' in bucket '{bucket}': {source}")]
    Listing {
        bucket: String,
        prefix: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Generator is missing required settings
    #[error("report generator misconfigured: {0}")]
    Configuration(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_error_carries_channel_name() {
        let err = ChannelError::missing_settings("influxdb", &["INFLUXDB_URL", "INFLUXDB_TOKEN"]);
        assert_eq!(err.channel(), "influxdb");
        assert_eq!(err.kind(), "configuration");
        assert_eq!(
            err.to_string(),
            "channel 'influxdb' configuration error: missing settings: INFLUXDB_URL, INFLUXDB_TOKEN"
        );
    }

    #[test]
    fn test_upstream_status_in_message() {
        let err = ChannelError::upstream_status("teams", 502, "bad gateway");
        assert!(err.to_string().contains("502"));
        assert_eq!(err.channel(), "teams");
    }
}
