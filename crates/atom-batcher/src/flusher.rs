// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use atom_client::{ClientError, Response};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

use crate::backoff::{Backoff, BackoffConfig};
use crate::batch::{Batch, FlushReason};
use crate::errors::FlushError;
use crate::notifier::Notifier;
use crate::transport::Transport;

#[derive(Debug)]
enum Delivery {
    Delivered,
    Retry(Response),
    Failed(FlushError),
}

/// 2xx is delivered, 4xx and transport errors are final, anything else is retried.
fn classify(result: Result<Response, ClientError>) -> Delivery {
    match result {
        Ok(resp) if resp.is_success() => Delivery::Delivered,
        Ok(resp) if resp.is_client_error() => Delivery::Failed(FlushError::Rejected {
            status_code: resp.status_code,
            status: resp.status,
            message: resp.message,
        }),
        Ok(resp) => Delivery::Retry(resp),
        Err(e) => Delivery::Failed(FlushError::Transport(e)),
    }
}

/// Sends one batch until it is delivered or fails for good.
pub(crate) struct Flusher {
    transport: Arc<dyn Transport>,
    stream_name: String,
    backoff: BackoffConfig,
    notifier: Notifier,
}

impl Flusher {
    pub fn new(
        transport: Arc<dyn Transport>,
        stream_name: String,
        backoff: BackoffConfig,
        notifier: Notifier,
    ) -> Self {
        Self {
            transport,
            stream_name,
            backoff,
            notifier,
        }
    }

    pub async fn flush(&self, batch: Batch, reason: FlushReason) {
        let mut backoff = Backoff::new(self.backoff);
        let mut reason = reason;

        loop {
            debug!(
                "Flushing {} records ({} bytes) to {}, reason: {reason}",
                batch.len(),
                batch.size(),
                self.stream_name
            );
            let start = Instant::now();
            let result = self
                .transport
                .put_events(&self.stream_name, batch.events())
                .await;

            match classify(result) {
                Delivery::Delivered => {
                    debug!(
                        "Delivered {} records to {} in {} ms",
                        batch.len(),
                        self.stream_name,
                        start.elapsed().as_millis()
                    );
                    return;
                }
                Delivery::Retry(resp) => {
                    let delay = backoff.duration();
                    warn!(
                        "Flush to {} failed with status {}, retrying in {delay:?} (attempt {})",
                        self.stream_name,
                        resp.status,
                        backoff.attempt()
                    );
                    tokio::time::sleep(delay).await;
                    reason = FlushReason::Retry;
                }
                Delivery::Failed(e) => {
                    error!(
                        "Failed to deliver {} records to {}: {e}",
                        batch.len(),
                        self.stream_name
                    );
                    self.notifier.notify(batch, e).await;
                    return;
                }
            }
        }
    }
}
