// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::admission::Admission;
use crate::batch::{Accumulator, Batch, FlushReason};
use crate::flusher::Flusher;

/// Owns the inbound queue. Groups records into batches and hands each ready
/// batch to its own flush task, bounded by [`Admission`].
pub(crate) struct Dispatcher {
    events: mpsc::Receiver<Bytes>,
    accumulator: Accumulator,
    flush_interval: Duration,
    admission: Admission,
    flusher: Arc<Flusher>,
    shutdown: CancellationToken,
}

impl Dispatcher {
    pub fn new(
        events: mpsc::Receiver<Bytes>,
        accumulator: Accumulator,
        flush_interval: Duration,
        admission: Admission,
        flusher: Arc<Flusher>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            events,
            accumulator,
            flush_interval,
            admission,
            flusher,
            shutdown,
        }
    }

    /// Runs until shutdown is requested and the queue is drained, or until
    /// every sender is gone.
    pub async fn run(mut self) {
        debug!("Dispatch loop started");
        let mut ticker = interval(self.flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;

        let mut draining = false;
        loop {
            tokio::select! {
                () = self.shutdown.cancelled(), if !draining => {
                    debug!("Shutdown requested, draining inbound queue");
                    draining = true;
                    self.events.close();
                }
                event = self.events.recv() => {
                    let Some(event) = event else {
                        if let Some(batch) = self.accumulator.take_pending() {
                            self.dispatch(batch, FlushReason::Drain).await;
                        }
                        info!("Backlog drained");
                        break;
                    };
                    for (batch, reason) in self.accumulator.push(event) {
                        self.dispatch(batch, reason).await;
                    }
                }
                _ = ticker.tick() => {
                    if let Some(batch) = self.accumulator.take_pending() {
                        self.dispatch(batch, FlushReason::Interval).await;
                    }
                }
            }
        }
    }

    async fn dispatch(&self, batch: Batch, reason: FlushReason) {
        match self.admission.acquire().await {
            Ok(permit) => {
                let flusher = Arc::clone(&self.flusher);
                tokio::spawn(async move {
                    flusher.flush(batch, reason).await;
                    drop(permit);
                });
            }
            Err(e) => {
                error!("Admission closed ({e}), flushing {} records inline", batch.len());
                self.flusher.flush(batch, reason).await;
            }
        }
    }
}
