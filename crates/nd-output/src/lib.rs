//! `nd-output` — cost event writers for the noise-damage engine.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created                                                     |
//! |-----------|-------------|-------------------------------------------------------------------|
//! | *(none)*  | CSV         | `caused_costs.csv`, `affected_costs.csv`, `person_totals.csv`     |
//! | `sqlite`  | SQLite      | `noise_costs.db`                                                  |
//! | `parquet` | Parquet     | `caused_costs.parquet`, `affected_costs.parquet`, `person_totals.parquet` |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`EventOutputSink`], which implements `nd_damage::EventSink`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use nd_output::{CsvWriter, EventOutputSink};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut sink = EventOutputSink::new(writer);
//! calc.run(&mut sink)?;
//! if let Some(e) = sink.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod row;
pub mod sink;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use row::{person_total_rows, AffectedRow, CausedRow, PersonTotalRow};
pub use sink::{EventOutputSink, DEFAULT_BATCH_SIZE};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetWriter;
