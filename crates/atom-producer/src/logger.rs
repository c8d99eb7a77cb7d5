// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Log formatter for the producer.
//!
//! Every line is prefixed so producer output can be told apart from the
//! records it is fed:
//!
//! ```text
//! ATOM_BATCHER | INFO | Starting batcher for stream ibtest: batch count 500, ...
//! ATOM_BATCHER | WARN | Flush to ibtest failed with status 503 Service Unavailable, ...
//! ```

use std::fmt;
use thiserror::Error;
use tracing_core::{Event, Subscriber};
use tracing_subscriber::fmt::{
    format::{self, FormatEvent, FormatFields},
    FmtContext,
};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

const PREFIX: &str = "ATOM_BATCHER";

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("could not parse log level: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("setting default subscriber failed: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

#[derive(Debug, Clone, Copy)]
pub struct Formatter;

impl<S, N> FormatEvent<S, N> for Formatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(&mut writer, "{PREFIX} | {} | ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Installs the global subscriber. `log_level` is any `EnvFilter` directive,
/// usually a bare level such as `info`.
pub fn init(log_level: &str) -> Result<(), LoggerError> {
    let filter = EnvFilter::try_new(format!("h2=off,hyper=off,rustls=off,{log_level}"))?;

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(filter)
        .event_format(Formatter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt::Subscriber::builder()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .event_format(Formatter)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_prefix_and_level() {
        let output = capture(|| tracing::info!("Stopped batcher"));
        assert_eq!(output, "ATOM_BATCHER | INFO | Stopped batcher\n");
    }

    #[test]
    fn test_event_fields_follow_message() {
        let output = capture(|| tracing::warn!(records = 3, "Dropped batch"));
        assert_eq!(output, "ATOM_BATCHER | WARN | Dropped batch records=3\n");
    }

    #[test]
    fn test_invalid_filter() {
        assert!(matches!(init("info,atom_batcher=loud"), Err(LoggerError::Filter(_))));
    }
}
