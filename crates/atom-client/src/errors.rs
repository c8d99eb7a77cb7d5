// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors returned by [`crate::AtomClient`].
///
/// An HTTP response with an error status is not a `ClientError`; it is
/// returned as a regular [`crate::Response`] so the caller can classify it.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid api key. length must be at least 1")]
    InvalidApiKey,

    #[error("Invalid stream name. length must be at least 1")]
    InvalidStream,

    #[error("events length must be at least 1")]
    EmptyBatch,

    #[error("Invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unable to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Unable to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ClientError::InvalidStream.to_string(),
            "Invalid stream name. length must be at least 1"
        );
        assert_eq!(
            ClientError::EmptyBatch.to_string(),
            "events length must be at least 1"
        );
    }

    #[test]
    fn test_invalid_url_display() {
        let source = url::Url::parse("not a url").unwrap_err();
        let error = ClientError::InvalidUrl {
            url: "not a url".to_string(),
            source,
        };
        assert!(error.to_string().starts_with("Invalid url 'not a url'"));
    }
}
