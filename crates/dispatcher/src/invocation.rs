//! Invocation - one generate-then-notify run

use std::sync::Arc;

use contracts::{Report, ReportSource};
use tracing::{error, info, instrument};

use crate::dispatcher::Dispatcher;
use crate::error::InvocationError;
use crate::summary::DispatchSummary;

/// A successful run: the report and how every channel fared
#[derive(Debug)]
pub struct InvocationSummary {
    pub report: Arc<Report>,
    pub dispatch: DispatchSummary,
}

/// Generates one report and hands it to the dispatcher
pub struct Invocation<'a, S> {
    source: &'a S,
    dispatcher: &'a Dispatcher,
    channels: Vec<String>,
}

impl<'a, S: ReportSource> Invocation<'a, S> {
    pub fn new(source: &'a S, dispatcher: &'a Dispatcher, channels: Vec<String>) -> Self {
        Self {
            source,
            dispatcher,
            channels,
        }
    }

    /// Generate, then notify
    ///
    /// A generation failure aborts before any channel is invoked. Channel
    /// failures are logged one by one and returned together with the report.
    #[instrument(name = "invocation_run", skip(self), fields(channels = ?self.channels))]
    pub async fn run(self) -> Result<InvocationSummary, InvocationError> {
        let report = match self.source.generate().await {
            Ok(report) => Arc::new(report),
            Err(e) => {
                error!(error = %e, "Report generation failed, no notifications sent");
                return Err(InvocationError::Generation(e));
            }
        };

        info!(
            report_id = report.id,
            report = %report.name,
            services = report.services.len(),
            "Report generated"
        );

        let dispatch = self
            .dispatcher
            .dispatch_detailed(Arc::clone(&report), self.channels.as_slice())
            .await;

        if dispatch.is_success() {
            return Ok(InvocationSummary { report, dispatch });
        }

        let attempted = dispatch.channel_count();
        let errors = dispatch.into_errors();
        for e in &errors {
            error!(channel = %e.channel(), kind = e.kind(), error = %e, "Channel failed");
        }

        Err(InvocationError::Notification {
            report,
            attempted,
            errors,
        })
    }
}
