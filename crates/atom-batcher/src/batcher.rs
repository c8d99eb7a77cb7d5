// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use bytes::Bytes;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::admission::Admission;
use crate::batch::Accumulator;
use crate::config::BatcherConfig;
use crate::dispatcher::Dispatcher;
use crate::errors::{BatcherError, ConfigError};
use crate::flusher::Flusher;
use crate::lifecycle::Lifecycle;
use crate::notifier::{FailureChannel, FailureReceiver, Notifier};
use crate::transport::Transport;

enum Task {
    Idle(Dispatcher),
    Running(JoinHandle<()>),
    Finished,
}

/// Buffers records for one stream and ships them in bulk.
///
/// Records are flushed when a batch reaches `batch_count` records or
/// `batch_size` bytes, and every `flush_interval` otherwise. Up to
/// `max_connections` flushes run at once. Retryable failures are retried with
/// backoff; the rest are reported through [`Batcher::notify_failures`].
///
/// All methods take `&self`; share the batcher behind an `Arc` to put from
/// several tasks.
pub struct Batcher {
    config: BatcherConfig,
    lifecycle: Lifecycle,
    failures: Arc<FailureChannel>,
    admission: Admission,
    shutdown: CancellationToken,
    stopped: CancellationToken,
    task: Mutex<Task>,
}

impl Batcher {
    pub fn new(config: BatcherConfig, transport: Arc<dyn Transport>) -> Result<Self, ConfigError> {
        config.validate()?;

        let backlog = config.backlog_count();
        let (tx, rx) = mpsc::channel(backlog);
        let lifecycle = Lifecycle::new(tx);
        let failures = Arc::new(FailureChannel::new(backlog));
        let admission = Admission::new(config.max_connections);
        let shutdown = CancellationToken::new();

        let flusher = Arc::new(Flusher::new(
            transport,
            config.stream_name.clone(),
            config.backoff,
            Notifier::new(Arc::clone(&failures)),
        ));
        let dispatcher = Dispatcher::new(
            rx,
            Accumulator::new(config.batch_count, config.batch_size),
            config.flush_interval,
            admission.clone(),
            flusher,
            shutdown.clone(),
        );

        Ok(Self {
            config,
            lifecycle,
            failures,
            admission,
            shutdown,
            stopped: CancellationToken::new(),
            task: Mutex::new(Task::Idle(dispatcher)),
        })
    }

    pub fn config(&self) -> &BatcherConfig {
        &self.config
    }

    pub fn is_stopped(&self) -> bool {
        self.lifecycle.is_stopped()
    }

    fn task(&self) -> MutexGuard<'_, Task> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawns the dispatch loop on the current Tokio runtime.
    ///
    /// Calling it more than once, or after [`Batcher::stop`], does nothing.
    pub fn start(&self) {
        let mut task = self.task();
        match std::mem::replace(&mut *task, Task::Finished) {
            Task::Idle(dispatcher) => {
                info!(
                    "Starting batcher for stream {}: batch count {}, batch size {} bytes, flush interval {:?}, max connections {}",
                    self.config.stream_name,
                    self.config.batch_count,
                    self.config.batch_size,
                    self.config.flush_interval,
                    self.config.max_connections
                );
                *task = Task::Running(tokio::spawn(dispatcher.run()));
            }
            other => {
                warn!("Batcher already started or stopped, ignoring start");
                *task = other;
            }
        }
    }

    /// Enqueues a record. Waits while the inbound queue is full.
    ///
    /// Fails with [`BatcherError::Stopped`] once [`Batcher::stop`] has begun,
    /// including for calls that were waiting on a full queue at that moment.
    pub async fn put(&self, event: impl Into<Bytes>) -> Result<(), BatcherError> {
        let events = self.lifecycle.event_sender()?;
        events
            .send(event.into())
            .await
            .map_err(|_| BatcherError::Stopped)
    }

    /// Returns the receiving end of the failure channel, creating it on the
    /// first call. Every call returns a handle to the same channel.
    ///
    /// Records that fail before this is called are dropped. The channel is
    /// not closed by [`Batcher::stop`]; it closes once the batcher is dropped
    /// and its last flush has finished.
    /// Failures are buffered up to the backlog count, after which flushes
    /// wait for them to be read.
    pub fn notify_failures(&self) -> FailureReceiver {
        self.failures.activate()
    }

    /// Stops accepting records, flushes everything buffered and waits for
    /// in-flight flushes, retries included, to finish.
    ///
    /// If the batcher was never started the backlog is still drained.
    /// Only the first call does the work; concurrent and later calls wait
    /// for it to finish.
    pub async fn stop(&self) {
        let Some(events) = self.lifecycle.begin_stop() else {
            debug!("Batcher already stopping, waiting for it to finish");
            self.stopped.cancelled().await;
            return;
        };
        // released on completion, or if this call is cancelled midway
        let _done = self.stopped.clone().drop_guard();

        let backlog = events.max_capacity() - events.capacity();
        info!(
            "Stopping batcher for stream {}, {backlog} records in backlog",
            self.config.stream_name
        );
        drop(events);
        self.shutdown.cancel();

        let task = std::mem::replace(&mut *self.task(), Task::Finished);
        match task {
            Task::Idle(dispatcher) => dispatcher.run().await,
            Task::Running(handle) => {
                if let Err(e) = handle.await {
                    error!("Dispatch loop failed: {e}");
                }
            }
            Task::Finished => {}
        }

        if let Err(e) = self.admission.wait().await {
            error!("Failed waiting for in-flight flushes: {e}");
        }
        info!("Stopped batcher for stream {}", self.config.stream_name);
    }
}

impl Drop for Batcher {
    /// Starts draining whatever is still buffered. Dropping does not wait for
    /// delivery; call [`Batcher::stop`] for that.
    fn drop(&mut self) {
        self.shutdown.cancel();

        let task = self.task.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Task::Idle(dispatcher) = std::mem::replace(task, Task::Finished) {
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    warn!("Batcher dropped before it was started, draining backlog in the background");
                    runtime.spawn(dispatcher.run());
                }
                Err(_) => {
                    warn!("Batcher dropped outside a Tokio runtime, unsent records are lost");
                }
            }
        }
    }
}
