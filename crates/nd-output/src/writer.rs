//! The `OutputWriter` trait implemented by all backend writers.

use crate::{AffectedRow, CausedRow, OutputResult, PersonTotalRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// All methods are infallible from the sink's perspective: errors are
/// stored internally and retrieved with [`EventOutputSink::take_error`](crate::EventOutputSink::take_error).
pub trait OutputWriter {
    /// Write a batch of caused-cost events.
    fn write_caused(&mut self, rows: &[CausedRow]) -> OutputResult<()>;

    /// Write a batch of affected-cost events.
    fn write_affected(&mut self, rows: &[AffectedRow]) -> OutputResult<()>;

    /// Write the per-person totals once the run has ended.
    fn write_person_totals(&mut self, rows: &[PersonTotalRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
