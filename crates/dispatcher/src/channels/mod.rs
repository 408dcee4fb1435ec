//! Channel implementations
//!
//! Contains the InfluxDB, SMTP, Teams and log channels, plus a scriptable
//! mock for tests.

mod influxdb;
mod log;
mod mock;
mod smtp;
mod teams;

pub use self::influxdb::{line_protocol, point_timestamp, InfluxDbChannel};
pub use self::log::LogChannel;
pub use self::mock::{MockBehavior, MockChannel};
pub use self::smtp::{render_html, SmtpChannel};
pub use self::teams::{build_card, TeamsChannel, TeamsMessage};

/// Registry key of the InfluxDB channel
pub const INFLUXDB: &str = "influxdb";
/// Registry key of the SMTP channel
pub const SMTP: &str = "smtp";
/// Registry key of the Teams channel
pub const TEAMS: &str = "teams";
/// Registry key of the log channel
pub const LOG: &str = "log";

/// All built-in keys
pub const BUILTIN: [&str; 4] = [INFLUXDB, SMTP, TEAMS, LOG];

/// Shorten an upstream response body for error messages
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 512;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short"), "short");
        let long = "é".repeat(400);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 515);
    }
}
