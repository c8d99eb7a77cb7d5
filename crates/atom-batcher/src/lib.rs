// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Batching producer for the ironSource.atom ingestion API.
//!
//! Records put into a [`Batcher`] are grouped per stream and delivered in bulk
//! through a [`Transport`], by default an [`atom_client::AtomClient`].

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod admission;
pub mod backoff;
pub mod batch;
pub mod batcher;
pub mod config;
mod dispatcher;
pub mod errors;
mod flusher;
mod lifecycle;
pub mod notifier;
pub mod transport;

pub use backoff::BackoffConfig;
pub use batcher::Batcher;
pub use config::BatcherConfig;
pub use errors::{BatcherError, ConfigError, FlushError};
pub use notifier::{FailureEvent, FailureReceiver};
pub use transport::Transport;
