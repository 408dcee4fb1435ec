//! Report - the payload dispatched to every notification channel
//!
//! A report is built once per invocation and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Per-service backup tally for one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Opaque identifier (informational only)
    pub id: i64,

    /// Human-readable title, e.g. "Daily Backup Report: 27/03/2025"
    pub name: String,

    /// Logical report date as display text (dd/mm/yyyy)
    pub date: String,

    /// One entry per service, in display order
    #[serde(default)]
    pub services: Vec<Service>,
}

/// Backup count for a single service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Opaque identifier
    pub id: i64,

    /// Logical service / tenant name
    pub name: String,

    /// Storage prefix the count was computed from
    pub path: String,

    /// Number of qualifying objects
    pub count: u64,
}

impl Report {
    /// Create a report with no services
    pub fn new(id: i64, name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            date: date.into(),
            services: Vec::new(),
        }
    }

    /// Builder-style helper to append a service
    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    /// Sum of all service counts
    pub fn total_count(&self) -> u64 {
        self.services.iter().map(|s| s.count).sum()
    }

    /// Services with no objects for the report date
    pub fn empty_services(&self) -> impl Iterator<Item = &Service> {
        self.services.iter().filter(|s| s.count == 0)
    }
}

impl Service {
    pub fn new(id: i64, name: impl Into<String>, path: impl Into<String>, count: u64) -> Self {
        Self {
            id,
            name: name.into(),
            path: path.into(),
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Report {
        Report::new(1, "Daily Backup Report: 27/03/2025", "27/03/2025")
            .with_service(Service::new(1, "svc-a", "2025/svc-a", 3))
            .with_service(Service::new(2, "svc-b", "2025/svc-b", 0))
    }

    #[test]
    fn test_total_and_empty_services() {
        let report = sample();
        assert_eq!(report.total_count(), 3);
        let empty: Vec<_> = report.empty_services().map(|s| s.name.as_str()).collect();
        assert_eq!(empty, vec!["svc-b"]);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["date"], "27/03/2025");
        assert_eq!(json["services"][1]["count"], 0);
        assert_eq!(json["services"][0]["path"], "2025/svc-a");
    }

    #[test]
    fn test_services_default_when_absent() {
        let report: Report =
            serde_json::from_str(r#"{"id": 7, "name": "r", "date": "01/01/2025"}"#).unwrap();
        assert!(report.services.is_empty());
    }
}
