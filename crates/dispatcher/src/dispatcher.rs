//! Dispatcher - concurrent fan-out of one report to the requested channels

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::{timeout, Instant};
use tracing::{debug, error, info, instrument, warn};

use contracts::{ChannelError, NotifyConfig, Report};

use crate::registry::ChannelRegistry;
use crate::summary::{ChannelOutcome, DispatchSummary};

/// Default per-channel deadline
pub const DEFAULT_CHANNEL_TIMEOUT: Duration = Duration::from_secs(30);

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Deadline for a single channel send
    pub channel_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            channel_timeout: DEFAULT_CHANNEL_TIMEOUT,
        }
    }
}

impl DispatcherConfig {
    pub fn from_notify(notify: &NotifyConfig) -> Self {
        Self {
            channel_timeout: Duration::from_secs(notify.channel_timeout_secs),
        }
    }
}

/// Fans a report out to every resolved channel, one task per channel
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: ChannelRegistry,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(registry: ChannelRegistry, config: DispatcherConfig) -> Self {
        Self { registry, config }
    }

    /// Send the report to every requested channel and collect the errors
    ///
    /// Errors come back in completion order; an empty vec means every
    /// resolved channel delivered.
    pub async fn dispatch<S: AsRef<str>>(
        &self,
        report: impl Into<Arc<Report>>,
        channels: &[S],
    ) -> Vec<ChannelError> {
        self.dispatch_detailed(report, channels).await.into_errors()
    }

    /// Like `dispatch`, keeping per-channel outcome and timing
    #[instrument(
        name = "dispatcher_dispatch",
        skip(self, report, channels),
        fields(requested = channels.len())
    )]
    pub async fn dispatch_detailed<S: AsRef<str>>(
        &self,
        report: impl Into<Arc<Report>>,
        channels: &[S],
    ) -> DispatchSummary {
        let report = report.into();
        let started = Instant::now();

        let resolution = self.registry.resolve(channels);
        for name in &resolution.unknown {
            warn!(channel = %name, "Unknown notification channel, skipping");
        }
        for name in &resolution.duplicates {
            debug!(channel = %name, "Channel requested more than once, sending once");
        }

        if resolution.is_empty() {
            info!("No notification channels resolved, nothing to dispatch");
            return DispatchSummary::new(Vec::new(), started.elapsed());
        }

        info!(
            channels = ?resolution.names(),
            report_id = report.id,
            "Dispatching report"
        );

        let mut tasks = JoinSet::new();
        // task id -> (channel, send start), for tasks that end in a JoinError
        let mut in_flight = HashMap::with_capacity(resolution.channels.len());

        for (name, channel) in resolution.channels {
            let report = Arc::clone(&report);
            let deadline = self.config.channel_timeout;
            let task_name = name.clone();
            let sent_at = Instant::now();

            let handle = tasks.spawn(async move {
                let result = match timeout(deadline, channel.send(&report)).await {
                    Ok(result) => result,
                    Err(_) => Err(ChannelError::Timeout {
                        channel: task_name.clone(),
                        timeout_ms: deadline.as_millis() as u64,
                    }),
                };
                ChannelOutcome::new(task_name, sent_at.elapsed(), result)
            });
            in_flight.insert(handle.id(), (name, sent_at));
        }

        // Completion order, panics included
        let mut outcomes = Vec::with_capacity(in_flight.len());
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, outcome)) => outcomes.push(outcome),
                Err(join_err) => {
                    let Some((name, sent_at)) = in_flight.remove(&join_err.id()) else {
                        continue;
                    };
                    outcomes.push(ChannelOutcome::new(
                        name.clone(),
                        sent_at.elapsed(),
                        Err(ChannelError::Aborted {
                            channel: name,
                            message: join_err.to_string(),
                        }),
                    ));
                }
            }
        }

        for outcome in &outcomes {
            Self::record(outcome);
        }

        let summary = DispatchSummary::new(outcomes, started.elapsed());
        observability::record_dispatch(
            summary.channel_count(),
            summary.failure_count(),
            summary.elapsed(),
        );
        info!(
            channels = summary.channel_count(),
            failures = summary.failure_count(),
            elapsed_ms = summary.elapsed().as_millis() as u64,
            "Dispatch complete"
        );
        summary
    }

    fn record(outcome: &ChannelOutcome) {
        match &outcome.result {
            Ok(()) => {
                observability::record_channel_success(&outcome.channel, outcome.elapsed);
                info!(
                    channel = %outcome.channel,
                    elapsed_ms = outcome.elapsed.as_millis() as u64,
                    "Notification sent"
                );
            }
            Err(e) => {
                observability::record_channel_failure(&outcome.channel, e.kind(), outcome.elapsed);
                error!(
                    channel = %outcome.channel,
                    kind = e.kind(),
                    error = %e,
                    "Notification failed"
                );
            }
        }
    }
}
