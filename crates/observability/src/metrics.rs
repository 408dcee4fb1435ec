//! 通道发送指标
//!
//! 每次通道发送结束时调用，记录结果与耗时。

use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Record a successful channel send
pub fn record_channel_success(channel: &str, elapsed: Duration) {
    counter!(
        "backup_reporter_channel_sends_total",
        "channel" => channel.to_string(),
        "outcome" => "success"
    )
    .increment(1);
    histogram!("backup_reporter_channel_send_ms", "channel" => channel.to_string())
        .record(elapsed.as_secs_f64() * 1000.0);
}

/// Record a failed channel send, labelled with the failure kind
pub fn record_channel_failure(channel: &str, kind: &'static str, elapsed: Duration) {
    counter!(
        "backup_reporter_channel_sends_total",
        "channel" => channel.to_string(),
        "outcome" => kind
    )
    .increment(1);
    histogram!("backup_reporter_channel_send_ms", "channel" => channel.to_string())
        .record(elapsed.as_secs_f64() * 1000.0);
}

/// Record the totals of one dispatch round
pub fn record_dispatch(channels: usize, failures: usize, elapsed: Duration) {
    gauge!("backup_reporter_dispatch_channels").set(channels as f64);
    gauge!("backup_reporter_dispatch_failures").set(failures as f64);
    histogram!("backup_reporter_dispatch_ms").record(elapsed.as_secs_f64() * 1000.0);
}
