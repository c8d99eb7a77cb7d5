// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use crate::backoff::BackoffConfig;
use crate::errors::ConfigError;

/// Hard ceiling on the number of bytes sent in one bulk request (5MiB).
pub const MAX_BATCH_SIZE: usize = 5 << 20;
/// Hard ceiling on the number of records sent in one bulk request.
pub const MAX_BATCH_COUNT: usize = 500;
pub const MAX_CONNECTIONS: usize = 256;
pub const DEFAULT_MAX_CONNECTIONS: usize = 24;
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration for [`crate::Batcher`]
#[derive(Debug, Clone, PartialEq)]
pub struct BatcherConfig {
    /// Destination stream. Required.
    pub stream_name: String,
    /// Regular interval for flushing a non-empty buffer. Defaults to 5s.
    pub flush_interval: Duration,
    /// Maximum number of records per batch. Defaults to, and must not exceed, 500.
    pub batch_count: usize,
    /// Maximum number of bytes per batch. Defaults to, and must not exceed, 5MiB.
    pub batch_size: usize,
    /// Capacity of the inbound queue before `put` starts waiting, also used as the
    /// failure channel capacity. Defaults to `batch_count`.
    pub backlog_count: Option<usize>,
    /// Maximum number of flushes in flight at once. Defaults to 24, must be in 1..=256.
    pub max_connections: usize,
    /// Retry delays for batches rejected with a retryable status.
    pub backoff: BackoffConfig,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            stream_name: String::new(),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            batch_count: MAX_BATCH_COUNT,
            batch_size: MAX_BATCH_SIZE,
            backlog_count: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            backoff: BackoffConfig::default(),
        }
    }
}

impl BatcherConfig {
    pub fn new(stream_name: impl Into<String>) -> Self {
        Self {
            stream_name: stream_name.into(),
            ..Default::default()
        }
    }

    pub fn backlog_count(&self) -> usize {
        self.backlog_count.unwrap_or(self.batch_count)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stream_name.is_empty() {
            return Err(ConfigError::EmptyStreamName);
        }
        if self.flush_interval.is_zero() {
            return Err(ConfigError::ZeroFlushInterval);
        }
        if !(1..=MAX_BATCH_COUNT).contains(&self.batch_count) {
            return Err(ConfigError::BatchCount {
                value: self.batch_count,
                max: MAX_BATCH_COUNT,
            });
        }
        if !(1..=MAX_BATCH_SIZE).contains(&self.batch_size) {
            return Err(ConfigError::BatchSize {
                value: self.batch_size,
                max: MAX_BATCH_SIZE,
            });
        }
        if self.backlog_count == Some(0) {
            return Err(ConfigError::ZeroBacklogCount);
        }
        if !(1..=MAX_CONNECTIONS).contains(&self.max_connections) {
            return Err(ConfigError::MaxConnections {
                value: self.max_connections,
                max: MAX_CONNECTIONS,
            });
        }
        self.backoff.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BatcherConfig::new("stream");
        assert_eq!(config.flush_interval, Duration::from_secs(5));
        assert_eq!(config.batch_count, 500);
        assert_eq!(config.batch_size, 5 * 1024 * 1024);
        assert_eq!(config.max_connections, 24);
        assert_eq!(config.backlog_count(), 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backlog_defaults_to_batch_count() {
        let config = BatcherConfig {
            batch_count: 10,
            ..BatcherConfig::new("stream")
        };
        assert_eq!(config.backlog_count(), 10);

        let config = BatcherConfig {
            backlog_count: Some(3),
            ..config
        };
        assert_eq!(config.backlog_count(), 3);
    }

    #[test]
    fn test_default_config_requires_stream_name() {
        assert_eq!(
            BatcherConfig::default().validate(),
            Err(ConfigError::EmptyStreamName)
        );
    }

    #[test]
    fn test_validate_batch_count() {
        for batch_count in [0, 501] {
            let config = BatcherConfig {
                batch_count,
                ..BatcherConfig::new("stream")
            };
            assert_eq!(
                config.validate(),
                Err(ConfigError::BatchCount {
                    value: batch_count,
                    max: 500
                })
            );
        }
    }

    #[test]
    fn test_validate_batch_size() {
        let config = BatcherConfig {
            batch_size: MAX_BATCH_SIZE + 1,
            ..BatcherConfig::new("stream")
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BatchSize { .. })
        ));

        let config = BatcherConfig {
            batch_size: MAX_BATCH_SIZE,
            ..BatcherConfig::new("stream")
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_connections() {
        for max_connections in [0, 257] {
            let config = BatcherConfig {
                max_connections,
                ..BatcherConfig::new("stream")
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::MaxConnections { .. })
            ));
        }
        for max_connections in [1, 256] {
            let config = BatcherConfig {
                max_connections,
                ..BatcherConfig::new("stream")
            };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_validate_zero_values() {
        let config = BatcherConfig {
            flush_interval: Duration::ZERO,
            ..BatcherConfig::new("stream")
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroFlushInterval));

        let config = BatcherConfig {
            backlog_count: Some(0),
            ..BatcherConfig::new("stream")
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroBacklogCount));
    }

    #[test]
    fn test_validate_backoff() {
        let config = BatcherConfig {
            backoff: BackoffConfig {
                factor: 0.5,
                ..BackoffConfig::default()
            },
            ..BatcherConfig::new("stream")
        };
        assert!(matches!(config.validate(), Err(ConfigError::Backoff(_))));
    }
}
