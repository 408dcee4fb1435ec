//! LogChannel - logs the report summary via tracing

use async_trait::async_trait;
use contracts::{ChannelError, NotificationChannel, Report};
use tracing::{info, instrument, warn};

/// Channel that writes the report to the log, for debugging and dry setups
pub struct LogChannel {
    name: String,
}

impl LogChannel {
    /// Create a new LogChannel with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_report_summary(&self, report: &Report) {
        info!(
            channel = %self.name,
            report_id = report.id,
            report = %report.name,
            date = %report.date,
            services = report.services.len(),
            total = report.total_count(),
            "Backup report"
        );

        for service in &report.services {
            info!(
                channel = %self.name,
                service = %service.name,
                path = %service.path,
                count = service.count,
                "Service backups"
            );
        }

        for service in report.empty_services() {
            warn!(channel = %self.name, service = %service.name, "No backups found");
        }
    }
}

#[async_trait]
impl NotificationChannel for LogChannel {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_channel_send",
        skip(self, report),
        fields(channel = %self.name, report_id = report.id)
    )]
    async fn send(&self, report: &Report) -> Result<(), ChannelError> {
        self.log_report_summary(report);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Service;

    #[tokio::test]
    async fn test_log_channel_send() {
        let channel = LogChannel::new("log");
        let report = Report::new(1, "Daily Backup Report: 14/03/2025", "14/03/2025")
            .with_service(Service::new(1, "billing", "2025/billing", 0))
            .with_service(Service::new(2, "mongo", "2025/mongo", 4));

        assert!(channel.send(&report).await.is_ok());
    }

    #[test]
    fn test_log_channel_name() {
        let channel = LogChannel::new("audit_log");
        assert_eq!(channel.name(), "audit_log");
    }
}
