//! MockChannel - scriptable channel for tests and local wiring

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use contracts::{ChannelError, NotificationChannel, Report};

/// What a MockChannel does when invoked
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return Ok after the delay
    Succeed,
    /// Return a transport error with this message after the delay
    Fail(String),
    /// Never complete
    Hang,
    /// Panic inside the send
    Panic,
}

/// Channel that records every report it receives
pub struct MockChannel {
    name: String,
    behavior: MockBehavior,
    delay: Duration,
    calls: AtomicUsize,
    completed: AtomicUsize,
    received: Mutex<Vec<Report>>,
}

impl MockChannel {
    pub fn new(name: impl Into<String>, behavior: MockBehavior) -> Self {
        Self {
            name: name.into(),
            behavior,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(name: impl Into<String>) -> Self {
        Self::new(name, MockBehavior::Succeed)
    }

    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, MockBehavior::Fail(message.into()))
    }

    /// Sleep this long before acting
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of times send was entered
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of sends that ran to completion (success or error)
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Copies of every report received
    pub fn received(&self) -> Vec<Report> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationChannel for MockChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, report: &Report) -> Result<(), ChannelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(report.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let result = match &self.behavior {
            MockBehavior::Succeed => Ok(()),
            MockBehavior::Fail(message) => Err(ChannelError::transport(&self.name, message)),
            MockBehavior::Hang => std::future::pending().await,
            MockBehavior::Panic => panic!("mock channel '{}' panicked", self.name),
        };

        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}
