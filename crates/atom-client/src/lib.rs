// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Client for the ironSource.atom ingestion API.
//!
//! Events are posted as signed JSON envelopes. A single event goes to the
//! base endpoint, a batch of events goes to `<base>/bulk` encoded as a JSON
//! array of strings. Every HTTP response is handed back to the caller as a
//! [`Response`]; only failures to reach the endpoint are errors.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod payload;

pub use client::{AtomClient, Response};
pub use config::ClientConfig;
pub use errors::ClientError;
