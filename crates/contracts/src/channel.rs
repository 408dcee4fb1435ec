//! NotificationChannel trait - Dispatcher output interface
//!
//! Channels are stored as trait objects keyed by name, so the trait is
//! object-safe via `async_trait`.

use async_trait::async_trait;

use crate::{ChannelError, Report};

/// A single notification destination
///
/// Implementations must not panic on failure; every failure is returned
/// as a `ChannelError` carrying the channel name.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Channel name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Deliver the report
    ///
    /// Configuration is checked on every call, before anything is sent.
    ///
    /// # Errors
    /// `Configuration`, `Transport` or `UpstreamStatus` with channel context
    async fn send(&self, report: &Report) -> Result<(), ChannelError>;
}
