// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use atom_client::ClientError;
use thiserror::Error;

/// Invalid [`crate::BatcherConfig`]. Construction of the batcher is aborted.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("stream name must not be empty")]
    EmptyStreamName,

    #[error("flush interval must be greater than zero")]
    ZeroFlushInterval,

    #[error("batch count must be between 1 and {max}, got {value}")]
    BatchCount { value: usize, max: usize },

    #[error("batch size must be between 1 and {max} bytes, got {value}")]
    BatchSize { value: usize, max: usize },

    #[error("backlog count must be at least 1")]
    ZeroBacklogCount,

    #[error("max connections must be between 1 and {max}, got {value}")]
    MaxConnections { value: usize, max: usize },

    #[error("invalid backoff: {0}")]
    Backoff(String),
}

/// Errors returned to callers of [`crate::Batcher`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatcherError {
    #[error("Unable to put event. Batcher is already stopped")]
    Stopped,
}

/// Why a batch could not be delivered.
#[derive(Debug, Error)]
pub enum FlushError {
    /// The endpoint could not be reached or the request could not be built.
    #[error("transport error: {0}")]
    Transport(#[from] ClientError),

    /// The endpoint answered with a 4xx status.
    #[error("{status}: {message}")]
    Rejected {
        status_code: u16,
        status: String,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::BatchCount {
            value: 501,
            max: 500,
        };
        assert_eq!(
            error.to_string(),
            "batch count must be between 1 and 500, got 501"
        );
    }

    #[test]
    fn test_stopped_display() {
        assert_eq!(
            BatcherError::Stopped.to_string(),
            "Unable to put event. Batcher is already stopped"
        );
    }

    #[test]
    fn test_flush_error_display() {
        let rejected = FlushError::Rejected {
            status_code: 401,
            status: "401 Unauthorized".to_string(),
            message: "Auth Error".to_string(),
        };
        assert_eq!(rejected.to_string(), "401 Unauthorized: Auth Error");

        let transport = FlushError::from(ClientError::InvalidStream);
        assert_eq!(
            transport.to_string(),
            "transport error: Invalid stream name. length must be at least 1"
        );
    }
}
