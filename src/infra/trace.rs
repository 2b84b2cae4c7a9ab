//! Trace sinks for archived jobs.
//!
//! The core only produces [`TraceRow`] values; sinks decide where they go.

use std::io::Write;

use crate::core::{Scheduler, SimulationError, TraceRow};

/// Trace sink abstraction.
pub trait TraceSink {
    /// Record one row.
    fn record(&mut self, row: &TraceRow) -> Result<(), SimulationError>;

    /// Flush buffered rows, if any.
    fn flush(&mut self) -> Result<(), SimulationError> {
        Ok(())
    }
}

/// In-memory sink for tests and post-processing.
#[derive(Debug, Default)]
pub struct InMemoryTraceSink {
    rows: Vec<TraceRow>,
}

impl InMemoryTraceSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows recorded so far.
    #[must_use]
    pub fn rows(&self) -> &[TraceRow] {
        &self.rows
    }
}

impl TraceSink for InMemoryTraceSink {
    fn record(&mut self, row: &TraceRow) -> Result<(), SimulationError> {
        self.rows.push(row.clone());
        Ok(())
    }
}

/// Writes one JSON object per row.
#[derive(Debug)]
pub struct JsonLinesTraceSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesTraceSink<W> {
    /// Wrap `writer`.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for JsonLinesTraceSink<W> {
    fn record(&mut self, row: &TraceRow) -> Result<(), SimulationError> {
        serde_json::to_writer(&mut self.writer, row)
            .map_err(|e| SimulationError::Export(e.to_string()))?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| SimulationError::Export(e.to_string()))
    }

    fn flush(&mut self) -> Result<(), SimulationError> {
        self.writer
            .flush()
            .map_err(|e| SimulationError::Export(e.to_string()))
    }
}

/// Send every archived job of `scheduler` to `sink`; returns the row count.
///
/// # Errors
///
/// The first [`SimulationError::Export`] raised by the sink.
pub fn export_trace(scheduler: &Scheduler, sink: &mut dyn TraceSink) -> Result<usize, SimulationError> {
    let rows = scheduler.trace_rows();
    for row in &rows {
        sink.record(row)?;
    }
    sink.flush()?;
    Ok(rows.len())
}
