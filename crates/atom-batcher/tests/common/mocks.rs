// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Mock transport that records every bulk request it receives

use async_trait::async_trait;
use atom_batcher::Transport;
use atom_client::{ClientError, Response};
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Status(u16),
    Unreachable,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub stream: String,
    pub events: Vec<Bytes>,
}

/// Answers from a script; the last reply repeats once the script runs out.
pub struct RecordingTransport {
    script: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Call>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[allow(dead_code)]
impl RecordingTransport {
    pub fn ok() -> Self {
        Self::scripted(vec![Reply::Status(200)])
    }

    pub fn scripted(replies: Vec<Reply>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
            delay: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Every record received, across all calls, in call order.
    pub fn records(&self) -> Vec<Bytes> {
        self.calls()
            .into_iter()
            .flat_map(|call| call.events)
            .collect()
    }

    /// Requests that have started but not yet answered.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_reply(&self) -> Reply {
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            *script.front().unwrap()
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn put_events(&self, stream: &str, events: &[Bytes]) -> Result<Response, ClientError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.calls.lock().unwrap().push(Call {
            stream: stream.to_string(),
            events: events.to_vec(),
        });
        let reply = self.next_reply();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match reply {
            Reply::Status(code) => Ok(Response::new(code, "mock")),
            Reply::Unreachable => Err(ClientError::InvalidStream),
        }
    }
}
