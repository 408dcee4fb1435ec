//! ReportSource trait - producer side of an invocation

use crate::{GenerationError, Report};

/// Produces the report for one invocation
#[trait_variant::make(ReportSource: Send)]
pub trait LocalReportSource {
    /// Build the report
    ///
    /// # Errors
    /// Returns `GenerationError` when no report can be produced; the
    /// invocation must not notify anything in that case.
    async fn generate(&self) -> Result<Report, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Service;

    struct Fixed;

    impl ReportSource for Fixed {
        async fn generate(&self) -> Result<Report, GenerationError> {
            Ok(Report::new(1, "Daily Backup Report: 01/01/2025", "01/01/2025")
                .with_service(Service::new(1, "svc-a", "2025/svc-a", 2)))
        }
    }

    fn assert_send<T: Send>(_: &T) {}

    #[tokio::test]
    async fn test_generate_future_is_send() {
        let source = Fixed;
        let future = ReportSource::generate(&source);
        assert_send(&future);

        let report = future.await.unwrap();
        assert_eq!(report.total_count(), 2);
    }
}
