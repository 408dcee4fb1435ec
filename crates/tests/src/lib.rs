//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 内存 bucket → 报告生成 → 并发分发 的 e2e 测试（无需 S3 / 外部服务）

#[cfg(test)]
mod contract_tests {
    use contracts::{Report, Service};

    #[test]
    fn test_report_json_shape() {
        let report = Report::new(1_742_947_200, "Daily Backup Report: 26/03/2025", "26/03/2025")
            .with_service(Service::new(1, "svc-a", "2025/svc-a", 3))
            .with_service(Service::new(2, "svc-b", "2025/svc-b", 0));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["name"], "Daily Backup Report: 26/03/2025");
        assert_eq!(json["services"][1]["count"], 0);

        let back: Report = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::NaiveDate;
    use contracts::{parse_channel_list, GenerationError, Report, ReportSource, Service};
    use dispatcher::channels::{MockBehavior, MockChannel};
    use dispatcher::{
        ChannelRegistry, Dispatcher, DispatcherConfig, Invocation, InvocationError,
    };
    use reports::ReportGenerator;
    use storage::InMemoryBucket;
    use tokio::time::Instant;

    const CHANNELS: [&str; 3] = ["influxdb", "smtp", "teams"];

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 26).unwrap()
    }

    fn generator(bucket: InMemoryBucket) -> ReportGenerator<InMemoryBucket> {
        ReportGenerator::new(bucket, "backups").for_date(date())
    }

    fn two_services() -> InMemoryBucket {
        InMemoryBucket::new("backups").with_objects([
            "2025/svc-a/26032025/1.tar.gz",
            "2025/svc-a/26032025/2.tar.gz",
            "2025/svc-a/26032025/3.tar.gz",
            "2025/svc-b/25032025/old.tar.gz",
        ])
    }

    /// Registry of mocks under the built-in names, plus handles to inspect them
    fn mocks(behaviors: [MockChannel; 3]) -> (Dispatcher, Vec<Arc<MockChannel>>) {
        let mut registry = ChannelRegistry::new();
        let mut handles = Vec::new();
        for (name, channel) in CHANNELS.into_iter().zip(behaviors) {
            let channel = Arc::new(channel);
            registry.register(name, channel.clone());
            handles.push(channel);
        }
        (
            Dispatcher::new(registry, DispatcherConfig::default()),
            handles,
        )
    }

    fn all_succeeding() -> [MockChannel; 3] {
        CHANNELS.map(MockChannel::succeeding)
    }

    fn requested(raw: &str) -> Vec<String> {
        parse_channel_list(raw)
    }

    /// End-to-end: InMemoryBucket -> ReportGenerator -> Dispatcher -> channels
    #[tokio::test]
    async fn test_e2e_report_reaches_every_channel() {
        let (dispatcher, handles) = mocks(all_succeeding());
        let generator = generator(two_services());

        let summary = Invocation::new(&generator, &dispatcher, requested(" influxdb , smtp ,teams "))
            .run()
            .await
            .unwrap();

        assert_eq!(summary.dispatch.channel_count(), 3);
        for handle in &handles {
            let received = handle.received();
            assert_eq!(received.len(), 1);
            let services: Vec<(&str, u64)> = received[0]
                .services
                .iter()
                .map(|s| (s.name.as_str(), s.count))
                .collect();
            assert_eq!(services, vec![("svc-a", 3), ("svc-b", 0)]);
        }
    }

    #[tokio::test]
    async fn test_empty_report_still_dispatched() {
        let (dispatcher, handles) = mocks(all_succeeding());
        let generator = generator(InMemoryBucket::new("backups"));

        let summary = Invocation::new(&generator, &dispatcher, requested("influxdb,smtp,teams"))
            .run()
            .await
            .unwrap();

        assert!(summary.report.services.is_empty());
        for handle in &handles {
            assert_eq!(handle.calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_one_of_three_fails() {
        let (dispatcher, handles) = mocks([
            MockChannel::succeeding("influxdb"),
            MockChannel::failing("smtp", "535 authentication failed"),
            MockChannel::succeeding("teams"),
        ]);
        let report = Report::new(1, "Daily Backup Report: 26/03/2025", "26/03/2025");

        let errors = dispatcher.dispatch(report, &CHANNELS).await;

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].channel(), "smtp");
        assert_eq!(handles[0].completed(), 1);
        assert_eq!(handles[2].completed(), 1);
    }

    #[tokio::test]
    async fn test_unknown_and_blank_names_never_error() {
        let (dispatcher, handles) = mocks(all_succeeding());
        let report = Report::new(1, "Daily Backup Report: 26/03/2025", "26/03/2025");

        let errors = dispatcher
            .dispatch(report, &["", "  ", "slack", "teams", "TEAMS", "teams"])
            .await;

        assert!(errors.is_empty());
        assert_eq!(handles[0].calls(), 0);
        assert_eq!(handles[1].calls(), 0);
        assert_eq!(handles[2].calls(), 1);
    }

    #[tokio::test]
    async fn test_generation_failure_invokes_no_channel() {
        let (dispatcher, handles) = mocks(all_succeeding());
        let generator = generator(two_services().fail_prefix("2025/"));

        let err = Invocation::new(&generator, &dispatcher, requested("influxdb,smtp,teams"))
            .run()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InvocationError::Generation(GenerationError::Listing { .. })
        ));
        for handle in &handles {
            assert_eq!(handle.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_notification_failure_reports_all_errors() {
        let (dispatcher, _handles) = mocks([
            MockChannel::failing("influxdb", "connection refused"),
            MockChannel::succeeding("smtp"),
            MockChannel::failing("teams", "HTTP 500"),
        ]);
        let generator = generator(two_services());

        let err = Invocation::new(&generator, &dispatcher, requested("influxdb,smtp,teams"))
            .run()
            .await
            .unwrap_err();

        let mut failed: Vec<&str> = err.channel_errors().iter().map(|e| e.channel()).collect();
        failed.sort_unstable();
        assert_eq!(failed, vec!["influxdb", "teams"]);
        assert_eq!(err.report().map(|r| r.services.len()), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_time_is_slowest_channel() {
        let (dispatcher, _handles) = mocks([
            MockChannel::succeeding("influxdb").with_delay(Duration::from_secs(3)),
            MockChannel::succeeding("smtp").with_delay(Duration::from_secs(8)),
            MockChannel::succeeding("teams").with_delay(Duration::from_secs(5)),
        ]);
        let report = Report::new(1, "Daily Backup Report: 26/03/2025", "26/03/2025");

        let start = Instant::now();
        let summary = dispatcher.dispatch_detailed(report, &CHANNELS).await;
        let elapsed = start.elapsed();

        assert!(summary.is_success());
        assert!(elapsed >= Duration::from_secs(8));
        assert!(elapsed < Duration::from_secs(16));
        let order: Vec<&str> = summary.outcomes().iter().map(|o| o.channel.as_str()).collect();
        assert_eq!(order, vec!["influxdb", "teams", "smtp"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hang_and_panic_are_isolated() {
        let mut registry = ChannelRegistry::new();
        let ok = Arc::new(MockChannel::succeeding("teams"));
        registry.register("influxdb", Arc::new(MockChannel::new("influxdb", MockBehavior::Hang)));
        registry.register("smtp", Arc::new(MockChannel::new("smtp", MockBehavior::Panic)));
        registry.register("teams", ok.clone());
        let dispatcher = Dispatcher::new(
            registry,
            DispatcherConfig {
                channel_timeout: Duration::from_secs(30),
            },
        );
        let report = Report::new(1, "Daily Backup Report: 26/03/2025", "26/03/2025")
            .with_service(Service::new(1, "svc-a", "2025/svc-a", 3));

        let errors = dispatcher.dispatch(report, &CHANNELS).await;

        let mut kinds: Vec<(&str, &str)> = errors.iter().map(|e| (e.channel(), e.kind())).collect();
        kinds.sort_unstable();
        assert_eq!(kinds, vec![("influxdb", "timeout"), ("smtp", "aborted")]);
        assert_eq!(ok.completed(), 1);
    }

    #[tokio::test]
    async fn test_config_driven_channel_list() {
        let config = config_loader::ConfigLoader::load_with(None, |key| match key {
            "NOTIFY_METHODS" => Some(" teams ,log,teams,pagerduty ".to_string()),
            "S3_BUCKET_NAME" => Some("backups".to_string()),
            _ => None,
        })
        .unwrap();
        config_loader::validate(&config).unwrap();

        let registry = ChannelRegistry::with_builtin(&config, date()).unwrap();
        let resolution = registry.resolve(config.notify.channel_names().as_slice());

        assert_eq!(resolution.names(), vec!["teams", "log"]);
        assert_eq!(resolution.unknown, vec!["pagerduty"]);

        // teams has no webhook: fails fast with a configuration error, log succeeds
        let dispatcher = Dispatcher::new(registry, DispatcherConfig::from_notify(&config.notify));
        let generator = generator(two_services());
        let report = generator.generate().await.unwrap();
        let errors = dispatcher
            .dispatch(report, config.notify.channel_names().as_slice())
            .await;

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].channel(), "teams");
        assert_eq!(errors[0].kind(), "configuration");
    }
}
