//! Dispatcher error types

use std::sync::Arc;

use contracts::{ChannelError, GenerationError, Report};
use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Channel construction error
    #[error("failed to create channel '{name}': {message}")]
    ChannelSetup { name: String, message: String },
}

impl DispatcherError {
    /// Create a channel setup error
    pub fn channel_setup(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ChannelSetup {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Outcome of a failed invocation
#[derive(Debug, Error)]
pub enum InvocationError {
    /// No report was produced, nothing was dispatched
    #[error("report generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Report was produced but at least one channel failed
    #[error(
        "{} of {} notification channels failed for '{}'",
        .errors.len(),
        .attempted,
        .report.name
    )]
    Notification {
        report: Arc<Report>,
        attempted: usize,
        errors: Vec<ChannelError>,
    },
}

impl InvocationError {
    /// The generated report, if generation succeeded
    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::Generation(_) => None,
            Self::Notification { report, .. } => Some(report),
        }
    }

    /// Channel failures (empty for generation failures)
    pub fn channel_errors(&self) -> &[ChannelError] {
        match self {
            Self::Generation(_) => &[],
            Self::Notification { errors, .. } => errors,
        }
    }
}
