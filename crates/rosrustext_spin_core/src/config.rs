use std::env;
use std::time::Duration;

use crate::error::{CoreError, Result};

/// How long a driver loop waits on an empty queue before re-checking shutdown.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Buffered turn events per receiver before old ones are dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;
/// Largest accepted event buffer.
pub const MAX_EVENT_CAPACITY: usize = 1 << 16;

pub const POLL_MS_ENV: &str = "ROSRUSTEXT_SPIN_POLL_MS";
pub const EVENT_CAPACITY_ENV: &str = "ROSRUSTEXT_SPIN_EVENT_CAPACITY";

/// Spinner configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SpinConfig {
    pub poll_interval: Duration,
    pub event_capacity: usize,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl SpinConfig {
    /// Defaults overridden by `ROSRUSTEXT_SPIN_*` environment variables.
    ///
    /// Unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = lookup(POLL_MS_ENV).and_then(parse_u64) {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(capacity) = lookup(EVENT_CAPACITY_ENV).and_then(parse_usize) {
            config.event_capacity = capacity;
        }

        config
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_event_capacity(mut self, event_capacity: usize) -> Self {
        self.event_capacity = event_capacity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(CoreError::invalid_config(
                "poll_interval",
                "poll interval must be non-zero",
            ));
        }
        if self.event_capacity == 0 {
            return Err(CoreError::invalid_config(
                "event_capacity",
                "event capacity must be non-zero",
            ));
        }
        if self.event_capacity > MAX_EVENT_CAPACITY {
            return Err(CoreError::invalid_config(
                "event_capacity",
                "event capacity exceeds MAX_EVENT_CAPACITY",
            ));
        }
        Ok(())
    }
}

fn parse_u64(value: String) -> Option<u64> {
    value.trim().parse().ok()
}

// Values that do not fit the target's usize are treated as unparsable.
fn parse_usize(value: String) -> Option<usize> {
    parse_u64(value).and_then(|v| usize::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Domain, ErrorKind, Payload};

    #[test]
    fn lookup_overrides_defaults() {
        let config = SpinConfig::from_lookup(|key| match key {
            POLL_MS_ENV => Some(" 25 ".to_string()),
            EVENT_CAPACITY_ENV => Some("8".to_string()),
            _ => None,
        });
        assert_eq!(config.poll_interval, Duration::from_millis(25));
        assert_eq!(config.event_capacity, 8);
    }

    #[test]
    fn unparsable_values_keep_defaults() {
        let config = SpinConfig::from_lookup(|key| match key {
            POLL_MS_ENV => Some("soon".to_string()),
            EVENT_CAPACITY_ENV => Some("-1".to_string()),
            _ => None,
        });
        assert_eq!(config, SpinConfig::default());
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let err = SpinConfig::default()
            .with_poll_interval(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert_eq!(err.domain, Domain::Config);
        assert_eq!(err.kind, ErrorKind::InvalidArgument);

        assert!(SpinConfig::default()
            .with_event_capacity(0)
            .validate()
            .is_err());
        assert!(SpinConfig::default().validate().is_ok());
    }

    #[test]
    fn event_capacity_is_bounded() {
        let at_limit = SpinConfig::default().with_event_capacity(MAX_EVENT_CAPACITY);
        assert!(at_limit.validate().is_ok());

        let huge = SpinConfig::from_lookup(|key| match key {
            EVENT_CAPACITY_ENV => Some((MAX_EVENT_CAPACITY + 1).to_string()),
            _ => None,
        });
        let err = huge.validate().unwrap_err();
        assert_eq!(err.domain, Domain::Config);
        assert_eq!(
            err.payload,
            Payload::Context {
                key: "config",
                value: "event_capacity".into(),
            }
        );
    }
}
