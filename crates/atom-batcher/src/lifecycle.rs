// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use bytes::Bytes;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

use crate::errors::BatcherError;

#[derive(Debug)]
struct State {
    stopped: bool,
    events: Option<mpsc::Sender<Bytes>>,
}

/// Stop flag and the inbound sender, owned by the batcher alone.
///
/// The lock only guards cloning and swapping the sender. It is never held
/// across an `.await`.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    state: Mutex<State>,
}

impl Lifecycle {
    pub fn new(events: mpsc::Sender<Bytes>) -> Self {
        Self {
            state: Mutex::new(State {
                stopped: false,
                events: Some(events),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// A sender for the inbound queue, unless the batcher has been stopped.
    pub fn event_sender(&self) -> Result<mpsc::Sender<Bytes>, BatcherError> {
        let state = self.lock();
        match (&state.events, state.stopped) {
            (Some(events), false) => Ok(events.clone()),
            _ => Err(BatcherError::Stopped),
        }
    }

    /// Marks the batcher stopped and hands back the inbound sender.
    /// Returns `None` if it was already stopped.
    pub fn begin_stop(&self) -> Option<mpsc::Sender<Bytes>> {
        let mut state = self.lock();
        if state.stopped {
            return None;
        }
        state.stopped = true;
        state.events.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_until_stopped() {
        let (tx, _rx) = mpsc::channel(1);
        let lifecycle = Lifecycle::new(tx);
        assert!(lifecycle.event_sender().is_ok());
        assert!(!lifecycle.is_stopped());

        assert!(lifecycle.begin_stop().is_some());
        assert!(lifecycle.is_stopped());
        assert_eq!(lifecycle.event_sender().unwrap_err(), BatcherError::Stopped);
    }

    #[test]
    fn test_begin_stop_once() {
        let (tx, _rx) = mpsc::channel(1);
        let lifecycle = Lifecycle::new(tx);
        assert!(lifecycle.begin_stop().is_some());
        assert!(lifecycle.begin_stop().is_none());
    }

    #[tokio::test]
    async fn test_begin_stop_releases_the_sender() {
        let (tx, mut rx) = mpsc::channel::<Bytes>(1);
        let lifecycle = Lifecycle::new(tx);
        drop(lifecycle.begin_stop());
        assert!(rx.recv().await.is_none());
    }
}
