// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

pub const DEFAULT_URL: &str = "https://track.atom-data.io/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`crate::AtomClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Account API key, used to sign every request
    pub api_key: String,
    /// Base endpoint. Bulk requests are sent to `<url>/bulk`
    pub url: String,
    /// Timeout for a single request
    pub timeout: Duration,
    /// Optional HTTPS proxy
    pub https_proxy: Option<String>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            url: DEFAULT_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            https_proxy: None,
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_https_proxy(mut self, https_proxy: Option<String>) -> Self {
        self.https_proxy = https_proxy;
        self
    }
}
