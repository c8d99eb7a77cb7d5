// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use bytes::Bytes;
use std::time::Instant;
use tracing::{debug, trace};
use url::Url;

use crate::auth::Signer;
use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::http::build_client;
use crate::payload::{encode_batch, Payload};

const BULK_PATH: &str = "bulk";

/// Minimal view of the HTTP response returned by the ingestion API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// e.g. "200 OK"
    pub status: String,
    /// e.g. 200
    pub status_code: u16,
    /// Response body, e.g. "OK"
    pub message: String,
}

impl Response {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        let status = match reqwest::StatusCode::from_u16(status_code) {
            Ok(code) => code.to_string(),
            Err(_) => status_code.to_string(),
        };
        Self {
            status,
            status_code,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }
}

/// Sends signed events to the ingestion API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct AtomClient {
    client: reqwest::Client,
    base: Url,
    bulk: Url,
    signer: Signer,
}

impl AtomClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let signer = Signer::new(&config.api_key)?;
        let base = Url::parse(&config.url).map_err(|source| ClientError::InvalidUrl {
            url: config.url.clone(),
            source,
        })?;
        let bulk = base
            .join(BULK_PATH)
            .map_err(|source| ClientError::InvalidUrl {
                url: config.url.clone(),
                source,
            })?;
        let client = build_client(config.https_proxy.as_deref(), config.timeout)?;

        Ok(Self {
            client,
            base,
            bulk,
            signer,
        })
    }

    /// Writes a single event into `stream`.
    ///
    /// To write multiple events in one request use [`AtomClient::put_events`].
    pub async fn put_event(&self, stream: &str, event: &[u8]) -> Result<Response, ClientError> {
        let data = String::from_utf8_lossy(event).into_owned();
        self.put(&self.base, stream, data, false).await
    }

    /// Writes multiple events into `stream` in a single request.
    pub async fn put_events(&self, stream: &str, events: &[Bytes]) -> Result<Response, ClientError> {
        if events.is_empty() {
            return Err(ClientError::EmptyBatch);
        }
        let data = encode_batch(events)?;
        self.put(&self.bulk, stream, data, true).await
    }

    async fn put(
        &self,
        url: &Url,
        stream: &str,
        data: String,
        bulk: bool,
    ) -> Result<Response, ClientError> {
        if stream.is_empty() {
            return Err(ClientError::InvalidStream);
        }
        let payload = Payload {
            stream: stream.to_string(),
            auth: self.signer.sign(data.as_bytes()),
            data,
            bulk,
        };
        let body = serde_json::to_vec(&payload)?;

        trace!("Posting {} bytes to {url}", body.len());
        let start = Instant::now();
        let resp = self
            .client
            .post(url.clone())
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        let message = resp.text().await.unwrap_or_default();
        debug!(
            "Request to {url} returned {status} in {} ms",
            start.elapsed().as_millis()
        );

        Ok(Response {
            status: status.to_string(),
            status_code: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_classification() {
        assert!(Response::new(200, "OK").is_success());
        assert!(Response::new(202, "").is_success());
        assert!(!Response::new(500, "").is_success());
        assert!(Response::new(401, "").is_client_error());
        assert!(Response::new(499, "").is_client_error());
        assert!(!Response::new(500, "").is_client_error());
        assert!(!Response::new(302, "").is_client_error());
    }

    #[test]
    fn test_response_status_text() {
        assert_eq!(Response::new(200, "OK").status, "200 OK");
        assert_eq!(Response::new(401, "").status, "401 Unauthorized");
    }

    #[test]
    fn test_bulk_url_is_resolved_against_base() {
        let client = AtomClient::new(ClientConfig::new("key")).unwrap();
        assert_eq!(client.base.as_str(), "https://track.atom-data.io/");
        assert_eq!(client.bulk.as_str(), "https://track.atom-data.io/bulk");
    }

    #[test]
    fn test_new_rejects_empty_api_key() {
        assert!(matches!(
            AtomClient::new(ClientConfig::new("")),
            Err(ClientError::InvalidApiKey)
        ));
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(matches!(
            AtomClient::new(ClientConfig::new("key").with_url("not a url")),
            Err(ClientError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_put_events_rejects_empty_batch() {
        let client = AtomClient::new(ClientConfig::new("key")).unwrap();
        assert!(matches!(
            client.put_events("stream", &[]).await,
            Err(ClientError::EmptyBatch)
        ));
    }

    #[tokio::test]
    async fn test_put_rejects_empty_stream() {
        let client = AtomClient::new(ClientConfig::new("key")).unwrap();
        assert!(matches!(
            client.put_event("", b"{}").await,
            Err(ClientError::InvalidStream)
        ));
        assert!(matches!(
            client.put_events("", &[Bytes::from_static(b"{}")]).await,
            Err(ClientError::InvalidStream)
        ));
    }
}
