// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Exponential backoff with optional jitter for retrying rejected batches.
//!
//! The delay for attempt `n` is `min * factor^n`, capped at `max`. With jitter
//! enabled the delay is drawn uniformly between `min` and that value.

use rand::Rng;
use std::time::Duration;

use crate::errors::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffConfig {
    pub min: Duration,
    pub max: Duration,
    pub factor: f64,
    pub jitter: bool,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(100),
            max: Duration::from_secs(10),
            factor: 2.0,
            jitter: true,
        }
    }
}

impl BackoffConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !self.factor.is_finite() || self.factor < 1.0 {
            return Err(ConfigError::Backoff(format!(
                "factor must be a finite number >= 1, got {}",
                self.factor
            )));
        }
        if self.min > self.max {
            return Err(ConfigError::Backoff(format!(
                "min ({:?}) must not exceed max ({:?})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Tracks consecutive attempts and hands out the delay for the next one.
#[derive(Debug, Clone)]
pub struct Backoff {
    config: BackoffConfig,
    attempt: u32,
}

impl Backoff {
    pub fn new(config: BackoffConfig) -> Self {
        Self { config, attempt: 0 }
    }

    /// Number of delays handed out since creation or the last [`Backoff::reset`].
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Returns the delay for the current attempt and advances the counter.
    pub fn duration(&mut self) -> Duration {
        let delay = self.for_attempt(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        delay
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    pub fn for_attempt(&self, attempt: u32) -> Duration {
        let min = self.config.min.as_secs_f64();
        let max = self.config.max.as_secs_f64();
        if min <= 0.0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        // powi overflows to infinity, which the cap brings back to max
        let capped = (min * self.config.factor.powi(exponent)).min(max);

        let secs = if self.config.jitter && capped > min {
            rand::thread_rng().gen_range(min..=capped)
        } else {
            capped
        };
        // f64 seconds can exceed what a Duration holds when max is huge
        Duration::try_from_secs_f64(secs).unwrap_or(self.config.max)
    }
}
