// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::future::Future;
use std::sync::Arc;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use atom_batcher::{Batcher, FailureReceiver};
use atom_client::AtomClient;

mod config;
mod logger;

use config::ProducerConfig;

#[tokio::main]
pub async fn main() {
    let config = ProducerConfig::from_env();

    let log_level = config
        .as_ref()
        .map(|config| config.log_level.as_str())
        .unwrap_or("info");
    if let Err(e) = logger::init(log_level) {
        eprintln!("Failed to initialize logging: {e}");
        return;
    }
    debug!("Logging subsystem enabled");

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {e}");
            return;
        }
    };

    let client = match AtomClient::new(config.client) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create client: {e}");
            return;
        }
    };

    let batcher = match Batcher::new(config.batcher, Arc::new(client)) {
        Ok(batcher) => batcher,
        Err(e) => {
            error!("Failed to create batcher: {e}");
            return;
        }
    };

    let shutdown = CancellationToken::new();
    let failure_logger = tokio::spawn(log_failures(
        batcher.notify_failures(),
        shutdown.clone(),
    ));
    batcher.start();

    let stdin = BufReader::new(io::stdin());
    let count = forward_lines(stdin, &batcher, tokio::signal::ctrl_c()).await;
    info!("Read {count} records, flushing remaining batches");

    batcher.stop().await;
    shutdown.cancel();
    if let Err(e) = failure_logger.await {
        error!("Failure logger task failed: {e}");
    }
}

/// Puts every non-empty line until EOF or until `interrupt` resolves. Returns
/// the number of records accepted.
async fn forward_lines<R, I>(reader: R, batcher: &Batcher, interrupt: I) -> usize
where
    R: AsyncBufRead + Unpin,
    I: Future,
{
    let mut lines = reader.lines();
    tokio::pin!(interrupt);

    let mut count = 0;
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = &mut interrupt => {
                info!("Received interrupt, shutting down");
                break;
            }
        };

        let line = match line {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("Reached end of input");
                break;
            }
            Err(e) => {
                error!("Failed to read input: {e}");
                break;
            }
        };

        // a full queue must not hide the interrupt
        tokio::select! {
            result = batcher.put(line) => match result {
                Ok(()) => count += 1,
                Err(e) => {
                    error!("{e}");
                    break;
                }
            },
            _ = &mut interrupt => {
                info!("Received interrupt while the queue was full, shutting down");
                break;
            }
        }
    }
    count
}

async fn log_failures(failures: FailureReceiver, shutdown: CancellationToken) {
    loop {
        tokio::select! {
            failure = failures.recv() => match failure {
                Some(failure) => error!("Dropped record: {failure}"),
                None => break,
            },
            () = shutdown.cancelled() => {
                while let Some(failure) = failures.try_recv() {
                    error!("Dropped record: {failure}");
                }
                break;
            }
        }
    }
}
