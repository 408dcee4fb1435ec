//! Environment overlay
//!
//! Each non-empty variable replaces the corresponding file value.
//! Lookups go through a closure so tests never touch the process env.

use contracts::{keys, ConfigError, ReporterConfig};

/// Apply environment variables on top of `config`
pub fn apply<F>(config: &mut ReporterConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(methods) = get(keys::NOTIFY_METHODS) {
        config.notify.methods = methods;
    }
    if let Some(raw) = get(keys::NOTIFY_TIMEOUT_SECS) {
        config.notify.channel_timeout_secs = parse_number(keys::NOTIFY_TIMEOUT_SECS, &raw)?;
    }

    overlay(&mut config.storage.bucket, get(keys::S3_BUCKET_NAME));
    overlay(&mut config.storage.role_arn, get(keys::AWS_ROLE_ARN));
    overlay(&mut config.storage.region, get(keys::AWS_REGION));

    overlay(&mut config.influxdb.url, get(keys::INFLUXDB_URL));
    overlay(&mut config.influxdb.token, get(keys::INFLUXDB_TOKEN));
    overlay(&mut config.influxdb.org, get(keys::INFLUXDB_ORG));
    overlay(&mut config.influxdb.bucket, get(keys::INFLUXDB_BUCKET));

    overlay(&mut config.smtp.host, get(keys::SMTP_HOST));
    if let Some(raw) = get(keys::SMTP_PORT) {
        config.smtp.port = Some(parse_number(keys::SMTP_PORT, &raw)?);
    }
    overlay(&mut config.smtp.username, get(keys::SMTP_USER));
    overlay(&mut config.smtp.password, get(keys::SMTP_PASS));
    overlay(&mut config.smtp.from_email, get(keys::SMTP_FROM_EMAIL));
    overlay(&mut config.smtp.from_name, get(keys::SMTP_FROM_NAME));
    if let Some(raw) = get(keys::SMTP_TO_EMAIL) {
        config.smtp.to = raw
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();
    }

    overlay(&mut config.teams.webhook_url, get(keys::TEAMS_WEBHOOK_URL));

    Ok(())
}

fn overlay(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ConfigError::validation(key, format!("invalid number '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = ReporterConfig::default();
        config.storage.bucket = Some("from-file".into());
        config.teams.webhook_url = Some("https://file".into());

        apply(
            &mut config,
            lookup(&[
                ("S3_BUCKET_NAME", "from-env"),
                ("NOTIFY_METHODS", "influxdb,smtp,teams"),
                ("TEAMS_WEBHOOK_URL", ""),
            ]),
        )
        .unwrap();

        assert_eq!(config.storage.bucket.as_deref(), Some("from-env"));
        assert_eq!(config.notify.methods, "influxdb,smtp,teams");
        // blank variables do not clear file values
        assert_eq!(config.teams.webhook_url.as_deref(), Some("https://file"));
    }

    #[test]
    fn test_smtp_recipients_split() {
        let mut config = ReporterConfig::default();
        apply(
            &mut config,
            lookup(&[
                ("SMTP_TO_EMAIL", "a@example.com, b@example.com,,"),
                ("SMTP_PORT", "587"),
            ]),
        )
        .unwrap();
        assert_eq!(config.smtp.to, vec!["a@example.com", "b@example.com"]);
        assert_eq!(config.smtp.port, Some(587));
    }

    #[test]
    fn test_invalid_port_is_validation_error() {
        let mut config = ReporterConfig::default();
        let err = apply(&mut config, lookup(&[("SMTP_PORT", "smtp")])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "SMTP_PORT"));
    }

    #[test]
    fn test_timeout_override() {
        let mut config = ReporterConfig::default();
        apply(&mut config, lookup(&[("NOTIFY_TIMEOUT_SECS", " 5 ")])).unwrap();
        assert_eq!(config.notify.channel_timeout_secs, 5);
    }
}
