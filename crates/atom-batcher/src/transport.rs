// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use atom_client::{AtomClient, ClientError, Response};
use bytes::Bytes;

/// Delivers a batch of records to a stream.
///
/// Any HTTP answer, including non-2xx statuses, is returned as `Ok`. `Err` is
/// reserved for requests that never produced a response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn put_events(&self, stream: &str, events: &[Bytes]) -> Result<Response, ClientError>;
}

#[async_trait]
impl Transport for AtomClient {
    async fn put_events(&self, stream: &str, events: &[Bytes]) -> Result<Response, ClientError> {
        AtomClient::put_events(self, stream, events).await
    }
}
