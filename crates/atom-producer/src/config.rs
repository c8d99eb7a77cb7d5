// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use atom_batcher::{BatcherConfig, ConfigError};
use atom_client::ClientConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ProducerConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} must be a non-negative integer, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error("Invalid log level '{0}'. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("invalid batcher configuration: {0}")]
    Batcher(#[from] ConfigError),
}

/// Configuration for the producer binary, read from `ATOM_*` environment variables
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    pub client: ClientConfig,
    pub batcher: BatcherConfig,
    pub log_level: String,
}

impl ProducerConfig {
    pub fn from_env() -> Result<Self, ProducerConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProducerConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(&lookup, "ATOM_API_KEY")?;
        let stream_name = required(&lookup, "ATOM_STREAM")?;

        let mut client = ClientConfig::new(api_key);
        if let Some(url) = lookup("ATOM_URL") {
            client = client.with_url(url);
        }
        if let Some(secs) = number::<u64, _>(&lookup, "ATOM_TIMEOUT_SECS")? {
            client = client.with_timeout(Duration::from_secs(secs));
        }
        client = client.with_https_proxy(lookup("ATOM_PROXY_HTTPS").or_else(|| lookup("HTTPS_PROXY")));

        let mut batcher = BatcherConfig::new(stream_name);
        if let Some(ms) = number::<u64, _>(&lookup, "ATOM_FLUSH_INTERVAL_MS")? {
            batcher.flush_interval = Duration::from_millis(ms);
        }
        if let Some(count) = number(&lookup, "ATOM_BATCH_COUNT")? {
            batcher.batch_count = count;
        }
        if let Some(size) = number(&lookup, "ATOM_BATCH_SIZE")? {
            batcher.batch_size = size;
        }
        if let Some(backlog) = number(&lookup, "ATOM_BACKLOG_COUNT")? {
            batcher.backlog_count = Some(backlog);
        }
        if let Some(connections) = number(&lookup, "ATOM_MAX_CONNECTIONS")? {
            batcher.max_connections = connections;
        }
        batcher.validate()?;

        let log_level = lookup("ATOM_LOG_LEVEL")
            .map(|val| val.to_lowercase())
            .unwrap_or_else(|| "info".to_string());
        if !VALID_LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(ProducerConfigError::InvalidLogLevel(log_level));
        }

        Ok(Self {
            client,
            batcher,
            log_level,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ProducerConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|val| !val.trim().is_empty())
        .ok_or(ProducerConfigError::Missing(key))
}

fn number<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ProducerConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ProducerConfigError::InvalidNumber { key, value }),
    }
}
