//! Per-channel dispatch outcomes

use std::time::Duration;

use contracts::ChannelError;

/// Result of one channel send
#[derive(Debug)]
pub struct ChannelOutcome {
    /// Registry key the send was resolved from
    pub channel: String,
    /// Wall time spent in the send
    pub elapsed: Duration,
    pub result: Result<(), ChannelError>,
}

impl ChannelOutcome {
    pub(crate) fn new(
        channel: impl Into<String>,
        elapsed: Duration,
        result: Result<(), ChannelError>,
    ) -> Self {
        Self {
            channel: channel.into(),
            elapsed,
            result,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// All outcomes of one dispatch, in completion order
#[derive(Debug, Default)]
pub struct DispatchSummary {
    outcomes: Vec<ChannelOutcome>,
    elapsed: Duration,
}

impl DispatchSummary {
    pub fn new(outcomes: Vec<ChannelOutcome>, elapsed: Duration) -> Self {
        Self { outcomes, elapsed }
    }

    /// Outcomes in the order sends completed
    pub fn outcomes(&self) -> &[ChannelOutcome] {
        &self.outcomes
    }

    /// Total dispatch wall time
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of channels that were invoked
    pub fn channel_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Channels that delivered
    pub fn succeeded(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_success())
            .map(|o| o.channel.as_str())
    }

    /// Channel errors, in completion order
    pub fn failures(&self) -> impl Iterator<Item = &ChannelError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// True when no channel failed (including when none were invoked)
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(ChannelOutcome::is_success)
    }

    /// Drop the successes, keep the errors in completion order
    pub fn into_errors(self) -> Vec<ChannelError> {
        self.outcomes
            .into_iter()
            .filter_map(|o| o.result.err())
            .collect()
    }

    /// Snapshot of the counts (for reporting)
    pub fn snapshot(&self) -> DispatchSnapshot {
        DispatchSnapshot {
            channels: self.channel_count(),
            succeeded: self.succeeded().count(),
            failed: self.failure_count(),
            elapsed: self.elapsed,
        }
    }
}

/// Snapshot of dispatch counts (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSnapshot {
    pub channels: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
}
