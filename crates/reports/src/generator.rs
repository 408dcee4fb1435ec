//! ReportGenerator - builds the daily report from bucket listings

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use contracts::{GenerationError, Report, ReportSource, Service};
use metrics::{counter, gauge};
use storage::{BucketClient, ListRequest};
use tracing::{debug, info, instrument, warn};

use crate::layout::DateLayout;

const DELIMITER: &str = "/";

/// Counts yesterday's (or a pinned date's) backups per service
pub struct ReportGenerator<C> {
    client: C,
    bucket: String,
    date: Option<NaiveDate>,
}

impl<C: BucketClient> ReportGenerator<C> {
    pub fn new(client: C, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            date: None,
        }
    }

    /// Pin the report date instead of using yesterday (UTC)
    pub fn for_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn layout(&self) -> DateLayout {
        self.date.map(DateLayout::new).unwrap_or_else(DateLayout::yesterday)
    }

    /// Service names found under the year prefix, deduplicated and sorted
    async fn discover_services(&self, layout: &DateLayout) -> Result<BTreeSet<String>, GenerationError> {
        let prefix = layout.year_prefix();
        let listing = self
            .client
            .list(&ListRequest::new(&self.bucket, &prefix, DELIMITER))
            .await
            .map_err(|e| GenerationError::Listing {
                bucket: self.bucket.clone(),
                prefix: prefix.clone(),
                source: Box::new(e),
            })?;

        let services: BTreeSet<String> = listing
            .common_prefixes
            .iter()
            .filter_map(|p| DateLayout::service_name(p))
            .map(str::to_string)
            .collect();

        debug!(prefix = %prefix, services = ?services, "Discovered services");
        Ok(services)
    }

    /// Direct children of the service's day prefix, `None` if listing failed
    async fn count_service(&self, layout: &DateLayout, service: &str) -> Option<u64> {
        let prefix = layout.day_prefix(service);
        match self
            .client
            .list(&ListRequest::new(&self.bucket, &prefix, DELIMITER))
            .await
        {
            Ok(listing) => Some(listing.children_of(&prefix).count() as u64),
            Err(e) => {
                warn!(service = %service, prefix = %prefix, error = %e, "Listing failed, service omitted");
                None
            }
        }
    }

    #[instrument(name = "report_generate", skip(self), fields(bucket = %self.bucket))]
    async fn build(&self) -> Result<Report, GenerationError> {
        let layout = self.layout();
        let display_date = layout.display_date();
        let services = self.discover_services(&layout).await?;

        let mut report = Report::new(
            Utc::now().timestamp(),
            format!("Daily Backup Report: {display_date}"),
            display_date,
        );

        for name in &services {
            let Some(count) = self.count_service(&layout, name).await else {
                continue;
            };
            gauge!("backup_reporter_service_objects", "service" => name.clone()).set(count as f64);
            let id = report.services.len() as i64 + 1;
            report
                .services
                .push(Service::new(id, name.as_str(), layout.service_path(name), count));
        }

        counter!("backup_reporter_reports_generated_total").increment(1);
        info!(
            report = %report.name,
            services = report.services.len(),
            total = report.total_count(),
            "Report generated"
        );

        Ok(report)
    }
}

impl<C: BucketClient> ReportSource for ReportGenerator<C> {
    async fn generate(&self) -> Result<Report, GenerationError> {
        self.build().await
    }
}
