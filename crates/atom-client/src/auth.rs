// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt::Debug;

use crate::errors::ClientError;

type HmacSha256 = Hmac<Sha256>;

/// Signs request data with the account API key.
///
/// The key is absorbed into the HMAC state once; each signature clones that
/// state so signing never re-derives the key.
#[derive(Clone)]
pub struct Signer {
    mac: HmacSha256,
}

impl Signer {
    pub fn new(api_key: &str) -> Result<Self, ClientError> {
        if api_key.is_empty() {
            return Err(ClientError::InvalidApiKey);
        }
        let mac =
            HmacSha256::new_from_slice(api_key.as_bytes()).map_err(|_| ClientError::InvalidApiKey)?;
        Ok(Self { mac })
    }

    /// Lowercase hex HMAC-SHA256 of `data`.
    pub fn sign(&self, data: &[u8]) -> String {
        let mut mac = self.mac.clone();
        mac.update(data);
        hex::encode(mac.finalize().into_bytes())
    }
}

impl Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signer")
    }
}
