//! `EventOutputSink<W>`: bridges `EventSink` to an `OutputWriter`.

use nd_damage::{AffectedCostEvent, CausedCostEvent, CostTotals, EventSink};

use crate::row::{person_total_rows, AffectedRow, CausedRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// Rows buffered per stream before they are handed to the writer.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// An [`EventSink`] that writes cost events and per-person totals to any
/// [`OutputWriter`] backend (CSV, SQLite, Parquet, …).
///
/// Errors from the writer are stored internally because `EventSink` methods
/// have no return value.  After `calc.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct EventOutputSink<W: OutputWriter> {
    writer:     W,
    batch_size: usize,
    caused:     Vec<CausedRow>,
    affected:   Vec<AffectedRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> EventOutputSink<W> {
    pub fn new(writer: W) -> Self {
        Self::with_batch_size(writer, DEFAULT_BATCH_SIZE)
    }

    /// Like [`new`](Self::new) with an explicit buffer size (minimum 1).
    pub fn with_batch_size(writer: W, batch_size: usize) -> Self {
        Self {
            writer,
            batch_size: batch_size.max(1),
            caused:     Vec::new(),
            affected:   Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn flush_caused(&mut self) {
        if self.caused.is_empty() {
            return;
        }
        let result = self.writer.write_caused(&self.caused);
        self.caused.clear();
        self.store_err(result);
    }

    fn flush_affected(&mut self) {
        if self.affected.is_empty() {
            return;
        }
        let result = self.writer.write_affected(&self.affected);
        self.affected.clear();
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> EventSink for EventOutputSink<W> {
    fn on_caused(&mut self, event: &CausedCostEvent) {
        self.caused.push(CausedRow::from(event));
        if self.caused.len() >= self.batch_size {
            self.flush_caused();
        }
    }

    fn on_affected(&mut self, event: &AffectedCostEvent) {
        self.affected.push(AffectedRow::from(event));
        if self.affected.len() >= self.batch_size {
            self.flush_affected();
        }
    }

    fn on_run_end(&mut self, totals: &CostTotals) {
        self.flush_caused();
        self.flush_affected();
        let result = self.writer.write_person_totals(&person_total_rows(totals));
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
