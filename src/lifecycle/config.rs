//! Runtime configuration.
//!
//! Defaults suit a single restaurant on a local network. Values can be
//! overridden from `FLOOR_SYNC_*` environment variables or a JSON document.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Notification hub settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Capacity of the store's change feed before slow readers lag.
    pub change_feed_capacity: usize,
    /// First reconnect delay.
    pub reconnect_delay_ms: u64,
    /// Upper bound of the exponential backoff.
    pub max_reconnect_delay_ms: u64,
    /// 0 retries forever.
    pub max_reconnect_attempts: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            change_feed_capacity: 256,
            reconnect_delay_ms: 500,
            max_reconnect_delay_ms: 10_000,
            max_reconnect_attempts: 20,
        }
    }
}

impl NotificationConfig {
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_max_reconnect_delay(mut self, delay: Duration) -> Self {
        self.max_reconnect_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    pub fn with_change_feed_capacity(mut self, capacity: usize) -> Self {
        self.change_feed_capacity = capacity;
        self
    }

    /// Delay before reconnect attempt `attempt` (1-based): doubles each time,
    /// capped at `max_reconnect_delay_ms`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(20);
        let delay = self.reconnect_delay_ms.saturating_mul(1u64 << exponent);
        Duration::from_millis(delay.min(self.max_reconnect_delay_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Requests queued on the repository actor before senders wait.
    pub repository_buffer: usize,
    /// Page size for table listings that do not name one.
    pub default_page_size: usize,
    pub notification: NotificationConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            repository_buffer: 32,
            default_page_size: 100,
            notification: NotificationConfig::default(),
        }
    }
}

impl SystemConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository_buffer(mut self, buffer: usize) -> Self {
        self.repository_buffer = buffer;
        self
    }

    pub fn with_default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn with_notification(mut self, notification: NotificationConfig) -> Self {
        self.notification = notification;
        self
    }

    /// Reads overrides from the environment; unset variables keep defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parses a JSON document. Missing fields keep defaults.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(document)?)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = parse(&lookup, "FLOOR_SYNC_REPOSITORY_BUFFER")? {
            config.repository_buffer = value;
        }
        if let Some(value) = parse(&lookup, "FLOOR_SYNC_PAGE_SIZE")? {
            config.default_page_size = value;
        }
        if let Some(value) = parse(&lookup, "FLOOR_SYNC_FEED_CAPACITY")? {
            config.notification.change_feed_capacity = value;
        }
        if let Some(value) = parse(&lookup, "FLOOR_SYNC_RECONNECT_DELAY_MS")? {
            config.notification.reconnect_delay_ms = value;
        }
        if let Some(value) = parse(&lookup, "FLOOR_SYNC_MAX_RECONNECT_DELAY_MS")? {
            config.notification.max_reconnect_delay_ms = value;
        }
        if let Some(value) = parse(&lookup, "FLOOR_SYNC_MAX_RECONNECT_ATTEMPTS")? {
            config.notification.max_reconnect_attempts = value;
        }
        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
    }
}
