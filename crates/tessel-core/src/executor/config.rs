//! Executor pacing configuration.

use std::time::Duration;

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};

/// Default wait between capacity polls while out of charges.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Shortest poll wait the executor will ever sleep.
pub const MIN_POLL_INTERVAL_MS: u64 = 1;

/// Default settle delay after each dispatch sub-action.
pub const DEFAULT_SETTLE_MS: u64 = 50;

/// Default settle delay after entering paint mode, which opens a panel.
pub const DEFAULT_PAINT_MODE_SETTLE_MS: u64 = 100;

/// Pacing for [`Executor`](super::Executor). All durations are milliseconds.
///
/// Deserializes from JSON with every field optional:
///
/// ```json
/// { "poll_interval_ms": 2000, "settle_ms": 75 }
/// ```
///
/// A `poll_interval_ms` of 0 is rejected, since it would re-query the
/// charge counter without ever yielding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutorConfig {
    /// Wait between capacity polls while charges are at zero.
    #[serde(deserialize_with = "positive_ms")]
    pub poll_interval_ms: u64,
    /// Delay after targeting, selecting a color, and confirming.
    pub settle_ms: u64,
    /// Delay after entering paint mode.
    pub paint_mode_settle_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            settle_ms: DEFAULT_SETTLE_MS,
            paint_mode_settle_ms: DEFAULT_PAINT_MODE_SETTLE_MS,
        }
    }
}

impl ExecutorConfig {
    /// Poll interval as a [`Duration`], never shorter than
    /// [`MIN_POLL_INTERVAL_MS`].
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        let ms = if self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            MIN_POLL_INTERVAL_MS
        } else {
            self.poll_interval_ms
        };
        Duration::from_millis(ms)
    }

    /// Settle delay as a [`Duration`].
    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Paint-mode settle delay as a [`Duration`].
    #[must_use]
    pub const fn paint_mode_settle(&self) -> Duration {
        Duration::from_millis(self.paint_mode_settle_ms)
    }
}

fn positive_ms<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let ms = u64::deserialize(deserializer)?;
    if ms < MIN_POLL_INTERVAL_MS {
        return Err(de::Error::invalid_value(
            Unexpected::Unsigned(ms),
            &"a poll interval of at least 1 ms",
        ));
    }
    Ok(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ExecutorConfig = serde_json::from_str(r#"{ "poll_interval_ms": 250 }"#).unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.settle_ms, DEFAULT_SETTLE_MS);
        assert_eq!(config.paint_mode_settle_ms, DEFAULT_PAINT_MODE_SETTLE_MS);
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let err = serde_json::from_str::<ExecutorConfig>(r#"{ "poll_interval_ms": 0 }"#)
            .unwrap_err();
        assert!(err.to_string().contains("at least 1 ms"));
    }

    #[test]
    fn test_zero_poll_interval_clamped_when_built_directly() {
        let config = ExecutorConfig {
            poll_interval_ms: 0,
            ..ExecutorConfig::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(MIN_POLL_INTERVAL_MS));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(serde_json::from_str::<ExecutorConfig>(r#"{ "poll": 1 }"#).is_err());
    }
}
