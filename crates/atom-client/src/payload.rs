// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! JSON envelope posted to the ingestion API.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Body of every request sent to the ingestion API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(rename = "table")]
    pub stream: String,
    pub auth: String,
    pub data: String,
    pub bulk: bool,
}

/// Encodes a batch as the JSON array of strings expected by the bulk endpoint.
///
/// Events are treated as UTF-8 text; invalid sequences are replaced.
pub fn encode_batch(events: &[Bytes]) -> Result<String, serde_json::Error> {
    let batch: Vec<Cow<'_, str>> = events
        .iter()
        .map(|event| String::from_utf8_lossy(event))
        .collect();
    serde_json::to_string(&batch)
}
