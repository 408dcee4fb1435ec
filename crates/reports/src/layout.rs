//! Date-bucketed key layout
//!
//! Backups are stored as `{yyyy}/{service}/{ddmmyyyy}/{artifact}`.

use chrono::{Days, NaiveDate, Utc};

/// Path conventions for one report date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateLayout {
    date: NaiveDate,
}

impl DateLayout {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Layout for the day before today (UTC)
    pub fn yesterday() -> Self {
        let today = Utc::now().date_naive();
        Self::new(today.checked_sub_days(Days::new(1)).unwrap_or(today))
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// `"2025/"`
    pub fn year_prefix(&self) -> String {
        format!("{}/", self.date.format("%Y"))
    }

    /// `"2025/growth-rds"`, recorded as the service path
    pub fn service_path(&self, service: &str) -> String {
        format!("{}/{}", self.date.format("%Y"), service)
    }

    /// `"2025/growth-rds/26032025/"`
    pub fn day_prefix(&self, service: &str) -> String {
        format!(
            "{}/{}/",
            self.service_path(service),
            self.date.format("%d%m%Y")
        )
    }

    /// `"26/03/2025"`
    pub fn display_date(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }

    /// Service name from a common prefix such as `"2025/growth-rds/"`
    ///
    /// Returns `None` when the prefix has fewer than two segments.
    pub fn service_name(prefix: &str) -> Option<&str> {
        let mut parts = prefix.trim_end_matches('/').split('/');
        parts.next()?;
        parts.next().filter(|name| !name.is_empty())
    }
}
