//! Notification sinks - relay short messages to the persona owner.
//!
//! Delivery is fire-and-forget: [`deliver`] logs failures and never hands
//! them back to the tool that asked for the push.

mod pushover;

pub use pushover::PushoverNotifier;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::Config;
use crate::Result;

/// Outbound notification sink.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sink name used in log events.
    fn name(&self) -> &str;

    /// Send one message.
    async fn send(&self, text: &str) -> Result<()>;
}

/// Sink used when no push credentials are configured; writes to the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, text: &str) -> Result<()> {
        info!(sink = "log", message = %text, "notification");
        Ok(())
    }
}

/// Send through `notifier`, swallowing any failure after logging it.
pub async fn deliver(notifier: &dyn Notifier, text: &str) {
    if let Err(e) = notifier.send(text).await {
        warn!(sink = notifier.name(), error = %e, "notification delivery failed");
    }
}

/// Pick a sink from configuration: Pushover when both credentials are set.
pub fn from_config(config: &Config) -> Result<Arc<dyn Notifier>> {
    let pushover = &config.pushover;
    if pushover.is_configured() {
        let notifier = PushoverNotifier::new(
            &pushover.token,
            &pushover.user,
            std::time::Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Arc::new(notifier))
    } else {
        info!("Pushover credentials not set; notifications go to the log");
        Ok(Arc::new(LogNotifier))
    }
}

/// Notifier that remembers what it was asked to send.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    sent: std::sync::Mutex<Vec<String>>,
    fail: bool,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every send fails after recording the text.
    pub fn failing() -> Self {
        Self {
            sent: std::sync::Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(crate::Error::Notify("sink unavailable".to_string()));
        }
        Ok(())
    }
}
