//! InfluxDbChannel - writes per-service backup counts as line protocol

use std::fmt::Write as _;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use contracts::{ChannelError, InfluxDbConfig, NotificationChannel, Report};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, info, instrument};

use super::truncate_body;

const MEASUREMENT: &str = "backup_count";

/// Channel that pushes one `backup_count` point per service to InfluxDB v2
pub struct InfluxDbChannel {
    name: String,
    config: InfluxDbConfig,
    report_date: NaiveDate,
    http: reqwest::Client,
}

impl InfluxDbChannel {
    /// `report_date` is the day the counts belong to; every point is stamped with it
    pub fn new(name: impl Into<String>, config: InfluxDbConfig, report_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            config,
            report_date,
            http: reqwest::Client::new(),
        }
    }
}

/// Point timestamp for a report day: midnight UTC, in seconds
pub fn point_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Render the report as one batch of line protocol, one point per service
pub fn line_protocol(report: &Report, timestamp_secs: i64) -> String {
    let mut body = String::new();
    for service in &report.services {
        // write! on a String cannot fail
        let _ = writeln!(
            body,
            "{MEASUREMENT},service_name={} count={}i {timestamp_secs}",
            escape_tag(&service.name),
            service.count
        );
    }
    body
}

// 标签值需要转义逗号、等号和空格
fn escape_tag(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, ',' | '=' | ' ') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl NotificationChannel for InfluxDbChannel {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "influxdb_channel_send",
        skip(self, report),
        fields(channel = %self.name, services = report.services.len())
    )]
    async fn send(&self, report: &Report) -> Result<(), ChannelError> {
        let settings = self
            .config
            .resolve()
            .map_err(|missing| ChannelError::missing_settings(&self.name, &missing.0))?;

        if report.services.is_empty() {
            debug!(channel = %self.name, "No services to write");
            return Ok(());
        }

        let timestamp = point_timestamp(self.report_date);
        let body = line_protocol(report, timestamp);

        let resp = self
            .http
            .post(format!("{}/api/v2/write", settings.url.trim_end_matches('/')))
            .query(&[
                ("org", settings.org),
                ("bucket", settings.bucket),
                ("precision", "s"),
            ])
            .header(AUTHORIZATION, format!("Token {}", settings.token))
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| ChannelError::transport(&self.name, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChannelError::upstream_status(
                &self.name,
                status.as_u16(),
                truncate_body(&body),
            ));
        }

        info!(
            channel = %self.name,
            points = report.services.len(),
            timestamp,
            "Wrote backup counts to InfluxDB"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Service;
    use httpmock::prelude::*;

    fn report_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn report() -> Report {
        Report::new(1, "Daily Backup Report: 14/03/2025", "14/03/2025")
            .with_service(Service::new(1, "billing", "2025/billing", 0))
            .with_service(Service::new(2, "growth rds", "2025/growth rds", 3))
    }

    fn config(url: String) -> InfluxDbConfig {
        InfluxDbConfig {
            url: Some(url),
            token: Some("secret-token".to_string()),
            org: Some("acme".to_string()),
            bucket: Some("backups".to_string()),
        }
    }

    #[test]
    fn test_line_protocol() {
        let body = line_protocol(&report(), 1_741_910_400);
        assert_eq!(
            body,
            "backup_count,service_name=billing count=0i 1741910400\n\
             backup_count,service_name=growth\\ rds count=3i 1741910400\n"
        );
    }

    #[test]
    fn test_point_timestamp_is_report_day() {
        assert_eq!(point_timestamp(report_date()), 1_741_910_400);
        assert_eq!(
            point_timestamp(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()),
            1_735_603_200
        );
    }

    #[test]
    fn test_escape_tag() {
        assert_eq!(escape_tag("a,b=c d"), "a\\,b\\=c\\ d");
        assert_eq!(escape_tag("plain-name"), "plain-name");
    }

    #[tokio::test]
    async fn test_send_writes_batch() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v2/write")
                    .query_param("org", "acme")
                    .query_param("bucket", "backups")
                    .query_param("precision", "s")
                    .header("authorization", "Token secret-token")
                    .body_contains("backup_count,service_name=billing count=0i")
                    .body_contains("service_name=growth\\ rds count=3i 1741910400");
                then.status(204);
            })
            .await;

        let channel = InfluxDbChannel::new("influxdb", config(server.base_url()), report_date());
        channel.send(&report()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_upstream_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v2/write");
                then.status(401).body("unauthorized access");
            })
            .await;

        let channel = InfluxDbChannel::new("influxdb", config(server.base_url()), report_date());
        let err = channel.send(&report()).await.unwrap_err();

        match err {
            ChannelError::UpstreamStatus { channel, status, body } => {
                assert_eq!(channel, "influxdb");
                assert_eq!(status, 401);
                assert_eq!(body, "unauthorized access");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_without_services_skips_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(204);
            })
            .await;

        let channel = InfluxDbChannel::new("influxdb", config(server.base_url()), report_date());
        let empty = Report::new(1, "Daily Backup Report: 14/03/2025", "14/03/2025");
        channel.send(&empty).await.unwrap();

        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_missing_settings_fail_fast() {
        let channel = InfluxDbChannel::new(
            "influxdb",
            InfluxDbConfig {
                url: Some("http://localhost:8086".to_string()),
                token: Some("  ".to_string()),
                ..Default::default()
            },
            report_date(),
        );

        let err = channel.send(&report()).await.unwrap_err();
        assert_eq!(err.kind(), "configuration");
        let message = err.to_string();
        assert!(message.contains("INFLUXDB_TOKEN"));
        assert!(message.contains("INFLUXDB_ORG"));
        assert!(message.contains("INFLUXDB_BUCKET"));
        assert!(!message.contains("INFLUXDB_URL"));
    }
}
