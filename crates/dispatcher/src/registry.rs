//! Channel registry - maps stable keys to channel instances

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use contracts::{NotificationChannel, ReporterConfig};
use tracing::{debug, instrument};

use crate::channels::{self, InfluxDbChannel, LogChannel, SmtpChannel, TeamsChannel};
use crate::error::DispatcherError;

/// Known channels, keyed by the name used in the channel list
#[derive(Default, Clone)]
pub struct ChannelRegistry {
    channels: BTreeMap<String, Arc<dyn NotificationChannel>>,
}

/// Channel list resolved against a registry
#[derive(Default, Clone)]
pub struct Resolution {
    /// Channels to invoke, first occurrence order
    pub channels: Vec<(String, Arc<dyn NotificationChannel>)>,
    /// Requested names with no registered channel
    pub unknown: Vec<String>,
    /// Names requested more than once (reported once each)
    pub duplicates: Vec<String>,
}

impl Resolution {
    /// Keys of the resolved channels
    pub fn names(&self) -> Vec<&str> {
        self.channels.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolution")
            .field("channels", &self.names())
            .field("unknown", &self.unknown)
            .field("duplicates", &self.duplicates)
            .finish()
    }
}

impl ChannelRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in channels, each holding its own settings section.
    /// `report_date` is the day being reported on (InfluxDB stamps its points with it).
    #[instrument(name = "registry_with_builtin", skip(config))]
    pub fn with_builtin(
        config: &ReporterConfig,
        report_date: NaiveDate,
    ) -> Result<Self, DispatcherError> {
        let mut registry = Self::new();
        registry.try_register(
            channels::INFLUXDB,
            Arc::new(InfluxDbChannel::new(
                channels::INFLUXDB,
                config.influxdb.clone(),
                report_date,
            )),
        )?;
        registry.try_register(
            channels::SMTP,
            Arc::new(SmtpChannel::new(channels::SMTP, config.smtp.clone())),
        )?;
        registry.try_register(
            channels::TEAMS,
            Arc::new(TeamsChannel::new(channels::TEAMS, config.teams.clone())),
        )?;
        registry.try_register(channels::LOG, Arc::new(LogChannel::new(channels::LOG)))?;

        debug!(channels = ?registry.names(), "Built-in channels registered");
        Ok(registry)
    }

    /// Register (or replace) a channel under `name`
    pub fn register(&mut self, name: impl Into<String>, channel: Arc<dyn NotificationChannel>) {
        self.channels.insert(name.into(), channel);
    }

    /// Register a channel, rejecting blank or already-taken names
    pub fn try_register(
        &mut self,
        name: impl Into<String>,
        channel: Arc<dyn NotificationChannel>,
    ) -> Result<(), DispatcherError> {
        let name = name.into();
        if name.trim().is_empty() || name.trim() != name {
            return Err(DispatcherError::channel_setup(
                name,
                "channel keys must be non-empty and carry no surrounding whitespace",
            ));
        }
        if self.channels.contains_key(&name) {
            return Err(DispatcherError::channel_setup(name, "already registered"));
        }
        self.channels.insert(name, channel);
        Ok(())
    }

    /// Exact, case-sensitive lookup
    pub fn get(&self, name: &str) -> Option<Arc<dyn NotificationChannel>> {
        self.channels.get(name).cloned()
    }

    /// Registered keys, sorted
    pub fn names(&self) -> Vec<&str> {
        self.channels.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Resolve a raw channel list: trim, drop blanks, split off unknown names,
    /// keep each known channel once
    pub fn resolve<S: AsRef<str>>(&self, requested: &[S]) -> Resolution {
        let mut resolution = Resolution::default();
        let mut seen = HashSet::new();

        for raw in requested {
            let name = raw.as_ref().trim();
            if name.is_empty() {
                continue;
            }

            if !seen.insert(name) {
                if !resolution.duplicates.iter().any(|d| d == name) {
                    resolution.duplicates.push(name.to_string());
                }
                continue;
            }

            match self.channels.get(name) {
                Some(channel) => resolution
                    .channels
                    .push((name.to_string(), Arc::clone(channel))),
                None => resolution.unknown.push(name.to_string()),
            }
        }

        resolution
    }
}

impl std::fmt::Debug for ChannelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelRegistry")
            .field("channels", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::MockChannel;

    fn registry() -> ChannelRegistry {
        let mut registry = ChannelRegistry::new();
        for name in ["influxdb", "smtp", "teams"] {
            registry.register(name, Arc::new(MockChannel::succeeding(name)));
        }
        registry
    }

    #[test]
    fn test_builtin_keys() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let registry = ChannelRegistry::with_builtin(&ReporterConfig::default(), date).unwrap();
        assert_eq!(registry.names(), vec!["influxdb", "log", "smtp", "teams"]);
        assert_eq!(registry.get("teams").unwrap().name(), "teams");
    }

    #[test]
    fn test_resolve_trims_whitespace() {
        let requested = contracts::parse_channel_list(" influxdb , smtp ,teams ");
        let resolution = registry().resolve(requested.as_slice());

        assert_eq!(resolution.names(), vec!["influxdb", "smtp", "teams"]);
        assert!(resolution.unknown.is_empty());
        assert!(resolution.duplicates.is_empty());
    }

    #[test]
    fn test_resolve_drops_unknown_and_blank() {
        let resolution = registry().resolve(&["slack", "", "  ", "teams", "Teams"]);

        assert_eq!(resolution.names(), vec!["teams"]);
        assert_eq!(resolution.unknown, vec!["slack", "Teams"]);
    }

    #[test]
    fn test_resolve_deduplicates() {
        let resolution = registry().resolve(&["teams", "smtp", " teams", "teams", "nope", "nope"]);

        assert_eq!(resolution.names(), vec!["teams", "smtp"]);
        assert_eq!(resolution.duplicates, vec!["teams", "nope"]);
        assert_eq!(resolution.unknown, vec!["nope"]);
    }

    #[test]
    fn test_resolve_empty_list() {
        let requested: Vec<String> = Vec::new();
        assert!(registry().resolve(requested.as_slice()).is_empty());
    }

    #[test]
    fn test_try_register_rejects_taken_and_blank_names() {
        let mut registry = registry();
        let err = registry
            .try_register("teams", Arc::new(MockChannel::succeeding("teams")))
            .unwrap_err();
        assert!(err.to_string().contains("already registered"));

        assert!(registry
            .try_register(" ", Arc::new(MockChannel::succeeding("blank")))
            .is_err());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = registry();
        registry.register("teams", Arc::new(MockChannel::failing("teams-v2", "down")));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("teams").unwrap().name(), "teams-v2");
    }
}
