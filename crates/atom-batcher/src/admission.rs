// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Caps the number of flushes in flight.
///
/// Every flush holds a [`Permit`] for its whole lifetime, retries included.
/// Dropping the permit gives the slot back.
#[derive(Debug, Clone)]
pub struct Admission {
    semaphore: Arc<Semaphore>,
    capacity: u32,
}

#[derive(Debug)]
pub struct Permit {
    _permit: OwnedSemaphorePermit,
}

impl Admission {
    /// `capacity` is clamped to at least one slot.
    pub fn new(capacity: usize) -> Self {
        let capacity = u32::try_from(capacity.max(1)).unwrap_or(u32::MAX);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity as usize)),
            capacity,
        }
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity as usize
    }

    #[cfg(test)]
    pub(crate) fn in_flight(&self) -> usize {
        self.capacity().saturating_sub(self.semaphore.available_permits())
    }

    /// Waits for a free slot.
    pub async fn acquire(&self) -> Result<Permit, AcquireError> {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await?;
        Ok(Permit { _permit: permit })
    }

    /// Waits until every outstanding permit has been released.
    pub async fn wait(&self) -> Result<(), AcquireError> {
        let all = self.semaphore.acquire_many(self.capacity).await?;
        drop(all);
        Ok(())
    }
}
