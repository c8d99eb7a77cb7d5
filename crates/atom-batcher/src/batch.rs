// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use bytes::Bytes;
use std::fmt;

/// Why a batch was handed to a flusher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushReason {
    BatchSize,
    BatchLength,
    Interval,
    Drain,
    Retry,
}

impl fmt::Display for FlushReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            FlushReason::BatchSize => "batch size",
            FlushReason::BatchLength => "batch length",
            FlushReason::Interval => "interval",
            FlushReason::Drain => "drain",
            FlushReason::Retry => "retry",
        };
        f.write_str(reason)
    }
}

/// Records sent together in one bulk request, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    events: Vec<Bytes>,
    size: usize,
}

impl Batch {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            size: 0,
        }
    }

    pub fn push(&mut self, event: Bytes) {
        self.size += event.len();
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Sum of the record lengths in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn events(&self) -> &[Bytes] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Bytes> {
        self.events
    }
}

/// Groups incoming records into batches bounded by count and byte size.
///
/// A record that would push a non-empty batch past `batch_size` closes that
/// batch first. A single record larger than `batch_size` therefore travels
/// alone.
#[derive(Debug)]
pub(crate) struct Accumulator {
    current: Batch,
    batch_count: usize,
    batch_size: usize,
}

impl Accumulator {
    pub fn new(batch_count: usize, batch_size: usize) -> Self {
        Self {
            current: Batch::with_capacity(batch_count),
            batch_count,
            batch_size,
        }
    }

    /// Appends `event` and returns the batches that became ready, oldest first.
    pub fn push(&mut self, event: Bytes) -> impl Iterator<Item = (Batch, FlushReason)> {
        let by_size = if !self.current.is_empty()
            && self.current.size() + event.len() > self.batch_size
        {
            Some((self.take(), FlushReason::BatchSize))
        } else {
            None
        };

        self.current.push(event);

        let by_length = if self.current.len() >= self.batch_count {
            Some((self.take(), FlushReason::BatchLength))
        } else {
            None
        };

        [by_size, by_length].into_iter().flatten()
    }

    /// Takes whatever is buffered, if anything.
    pub fn take_pending(&mut self) -> Option<Batch> {
        if self.current.is_empty() {
            None
        } else {
            Some(self.take())
        }
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.current.len()
    }

    fn take(&mut self) -> Batch {
        std::mem::replace(&mut self.current, Batch::with_capacity(self.batch_count))
    }
}
