//! Prometheus textfile export
//!
//! 一次性任务没有可抓取的端点：运行结束时把指标渲染成
//! node_exporter textfile collector 能读取的 `.prom` 文件。

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Global Prometheus recorder whose output is written to a file on demand
pub struct MetricsTextfile {
    handle: PrometheusHandle,
    path: PathBuf,
}

impl MetricsTextfile {
    /// Install the process-wide recorder; metrics recorded from now on end up in `path`
    pub fn install(path: impl Into<PathBuf>) -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        let path = path.into();

        tracing::info!(path = %path.display(), "Prometheus textfile export enabled");
        Ok(Self { handle, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the current metrics and replace the file
    ///
    /// Writes a sibling temp file first and renames it over `path`, so the
    /// collector never reads a half-written file.
    pub fn write(&self) -> Result<()> {
        let rendered = self.handle.render();
        let tmp = self.path.with_extension("prom.tmp");

        std::fs::write(&tmp, rendered)
            .with_context(|| format!("Failed to write metrics to {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to move metrics into {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), "Metrics textfile written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    // value of an unlabelled sample line
    fn sample(body: &str, name: &str) -> Option<f64> {
        body.lines()
            .filter_map(|line| line.strip_prefix(name)?.strip_prefix(' '))
            .find_map(|value| value.trim().parse().ok())
    }

    #[test]
    fn test_write_renders_recorded_metrics() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let dir = tempfile::tempdir().unwrap();
        let textfile = MetricsTextfile {
            handle: recorder.handle(),
            path: dir.path().join("backup_reporter.prom"),
        };

        ::metrics::with_local_recorder(&recorder, || {
            crate::record_channel_success("teams", Duration::from_millis(12));
            crate::record_channel_failure("smtp", "timeout", Duration::from_secs(30));
            crate::record_dispatch(2, 1, Duration::from_secs(30));
        });
        textfile.write().unwrap();

        let body = std::fs::read_to_string(textfile.path()).unwrap();
        assert!(body.contains("backup_reporter_channel_sends_total{"));
        assert!(body.contains(r#"outcome="timeout""#));
        assert!(body.contains(r#"channel="teams""#));
        assert_eq!(sample(&body, "backup_reporter_dispatch_failures"), Some(1.0));
        assert!(!dir.path().join("backup_reporter.prom.tmp").exists());
    }

    #[test]
    fn test_write_overwrites_previous_run() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup_reporter.prom");
        std::fs::write(&path, "stale_metric 1\n").unwrap();

        let textfile = MetricsTextfile {
            handle: recorder.handle(),
            path,
        };
        ::metrics::with_local_recorder(&recorder, || crate::record_dispatch(4, 0, Duration::ZERO));
        textfile.write().unwrap();

        let body = std::fs::read_to_string(textfile.path()).unwrap();
        assert!(!body.contains("stale_metric"));
        assert_eq!(sample(&body, "backup_reporter_dispatch_channels"), Some(4.0));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let dir = tempfile::tempdir().unwrap();
        let textfile = MetricsTextfile {
            handle: recorder.handle(),
            path: dir.path().join("missing").join("backup_reporter.prom"),
        };

        let err = textfile.write().unwrap_err();
        assert!(err.to_string().contains("Failed to write metrics"));
    }
}
