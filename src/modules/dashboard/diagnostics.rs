//! Write-only diagnostic sinks for failed aggregate calls
//!
//! The aggregator reports each failure to the sink configured at
//! construction. The default [`NoopSink`] discards everything.

use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;
use tracing::{error, warn};
use uuid::Uuid;

use crate::modules::provider::UserId;
use crate::shared::errors::AggregationError;

/// Record describing one failed aggregate call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticEvent {
    pub call_id: Uuid,
    pub user_id: UserId,
    pub elapsed_ms: u64,
    pub error: AggregationError,
}

pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: &DiagnosticEvent);
}

/// Discards every record
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _event: &DiagnosticEvent) {}
}

/// Forwards records to `tracing` at error level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: &DiagnosticEvent) {
        error!(
            call_id = %event.call_id,
            user_id = %event.user_id,
            elapsed_ms = event.elapsed_ms,
            error = %event.error,
            "Aggregation failed"
        );
    }
}

/// Writes each record as one JSON line
///
/// Records are written synchronously on the task that finished the aggregate
/// call, so the writer must be fast or in-memory (a buffer, a local file).
/// Wrap slow destinations in a channel-backed writer instead.
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> DiagnosticSink for JsonLinesSink<W> {
    fn record(&self, event: &DiagnosticEvent) {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };

        let written = serde_json::to_writer(&mut *writer, event)
            .map_err(std::io::Error::from)
            .and_then(|()| writer.write_all(b"\n"))
            .and_then(|()| writer.flush());

        // A sink must never fail the call it is reporting on
        if let Err(e) = written {
            warn!(call_id = %event.call_id, error = %e, "Failed to write diagnostic record");
        }
    }
}
