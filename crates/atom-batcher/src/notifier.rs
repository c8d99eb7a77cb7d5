// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use bytes::Bytes;
use std::fmt;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use crate::batch::Batch;
use crate::errors::FlushError;

/// A record that could not be delivered, with the reason its batch failed.
#[derive(Debug, Clone)]
pub struct FailureEvent {
    pub data: Bytes,
    pub error: Arc<FlushError>,
}

impl fmt::Display for FailureEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.error, self.data.len())
    }
}

/// Read side of the failure channel.
///
/// Clones share one queue, so each failure is seen by exactly one of them.
#[derive(Debug, Clone)]
pub struct FailureReceiver {
    rx: Arc<Mutex<mpsc::Receiver<FailureEvent>>>,
}

impl FailureReceiver {
    pub(crate) fn new(rx: mpsc::Receiver<FailureEvent>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Waits for the next failure. Returns `None` once the batcher and its
    /// in-flight flushes are gone and every queued failure has been read.
    pub async fn recv(&self) -> Option<FailureEvent> {
        self.rx.lock().await.recv().await
    }

    /// Returns a queued failure without waiting.
    pub fn try_recv(&self) -> Option<FailureEvent> {
        self.rx.try_lock().ok()?.try_recv().ok()
    }
}

/// Lazily created failure channel, shared by the batcher and its flushers.
#[derive(Debug)]
pub(crate) struct FailureChannel {
    channel: StdMutex<Option<(mpsc::Sender<FailureEvent>, FailureReceiver)>>,
    capacity: usize,
}

impl FailureChannel {
    pub fn new(capacity: usize) -> Self {
        Self {
            channel: StdMutex::new(None),
            capacity: capacity.max(1),
        }
    }

    /// Creates the channel on first use and returns its receiver.
    pub fn activate(&self) -> FailureReceiver {
        let mut channel = self.channel.lock().unwrap_or_else(PoisonError::into_inner);
        let capacity = self.capacity;
        let (_, receiver) = channel.get_or_insert_with(|| {
            let (tx, rx) = mpsc::channel(capacity);
            (tx, FailureReceiver::new(rx))
        });
        receiver.clone()
    }

    pub fn sender(&self) -> Option<mpsc::Sender<FailureEvent>> {
        self.channel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(tx, _)| tx.clone())
    }
}

/// Hands undeliverable records to the failure channel, if one was requested.
#[derive(Debug, Clone)]
pub(crate) struct Notifier {
    failures: Arc<FailureChannel>,
}

impl Notifier {
    pub fn new(failures: Arc<FailureChannel>) -> Self {
        Self { failures }
    }

    /// Waits while the channel is full. Only the calling flush is held up.
    pub async fn notify(&self, batch: Batch, error: FlushError) {
        let Some(tx) = self.failures.sender() else {
            debug!(
                "Dropping {} undeliverable records, no failure receiver",
                batch.len()
            );
            return;
        };

        let error = Arc::new(error);
        for data in batch.into_events() {
            let event = FailureEvent {
                data,
                error: Arc::clone(&error),
            };
            if tx.send(event).await.is_err() {
                warn!("Failure channel closed, dropping remaining records");
                return;
            }
        }
    }
}
