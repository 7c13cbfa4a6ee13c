//! Parquet output backend (feature `parquet`).
//!
//! Creates three files in the configured output directory:
//! - `caused_costs.parquet`
//! - `affected_costs.parquet`
//! - `person_totals.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, StringBuilder, UInt32Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{AffectedRow, CausedRow, OutputResult, PersonTotalRow};

fn caused_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("time_secs", DataType::UInt32,  false),
        Field::new("person",    DataType::Utf8,    false),
        Field::new("vehicle",   DataType::Utf8,    false),
        Field::new("link_id",   DataType::UInt32,  false),
        Field::new("category",  DataType::Utf8,    false),
        Field::new("amount",    DataType::Float64, false),
    ]))
}

fn affected_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("time_secs",   DataType::UInt32,  false),
        Field::new("person",      DataType::Utf8,    false),
        Field::new("receiver_id", DataType::UInt32,  false),
        Field::new("act_type",    DataType::Utf8,    false),
        Field::new("amount",      DataType::Float64, false),
    ]))
}

fn totals_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("person",   DataType::Utf8,    false),
        Field::new("caused",   DataType::Float64, false),
        Field::new("affected", DataType::Float64, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

fn open(dir: &Path, name: &str, schema: &Arc<Schema>) -> OutputResult<ArrowWriter<File>> {
    let file = File::create(dir.join(name))?;
    Ok(ArrowWriter::try_new(file, Arc::clone(schema), Some(snappy_props()))?)
}

/// Writes cost output to three Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footers; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    caused:          Option<ArrowWriter<File>>,
    affected:        Option<ArrowWriter<File>>,
    totals:          Option<ArrowWriter<File>>,
    caused_schema:   Arc<Schema>,
    affected_schema: Arc<Schema>,
    totals_schema:   Arc<Schema>,
}

impl ParquetWriter {
    /// Create all three Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let caused_schema = caused_schema();
        let affected_schema = affected_schema();
        let totals_schema = totals_schema();

        Ok(Self {
            caused:   Some(open(dir, "caused_costs.parquet", &caused_schema)?),
            affected: Some(open(dir, "affected_costs.parquet", &affected_schema)?),
            totals:   Some(open(dir, "person_totals.parquet", &totals_schema)?),
            caused_schema,
            affected_schema,
            totals_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_caused(&mut self, rows: &[CausedRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.caused.as_mut() else {
            return Ok(());
        };

        let mut times      = UInt32Builder::new();
        let mut persons    = StringBuilder::new();
        let mut vehicles   = StringBuilder::new();
        let mut links      = UInt32Builder::new();
        let mut categories = StringBuilder::new();
        let mut amounts    = Float64Builder::new();

        for row in rows {
            times.append_value(row.time_secs);
            persons.append_value(&row.person);
            vehicles.append_value(&row.vehicle);
            links.append_value(row.link_id);
            categories.append_value(row.category);
            amounts.append_value(row.amount);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.caused_schema),
            vec![
                Arc::new(times.finish()),
                Arc::new(persons.finish()),
                Arc::new(vehicles.finish()),
                Arc::new(links.finish()),
                Arc::new(categories.finish()),
                Arc::new(amounts.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_affected(&mut self, rows: &[AffectedRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.affected.as_mut() else {
            return Ok(());
        };

        let mut times     = UInt32Builder::new();
        let mut persons   = StringBuilder::new();
        let mut receivers = UInt32Builder::new();
        let mut act_types = StringBuilder::new();
        let mut amounts   = Float64Builder::new();

        for row in rows {
            times.append_value(row.time_secs);
            persons.append_value(&row.person);
            receivers.append_value(row.receiver_id);
            act_types.append_value(&row.act_type);
            amounts.append_value(row.amount);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.affected_schema),
            vec![
                Arc::new(times.finish()),
                Arc::new(persons.finish()),
                Arc::new(receivers.finish()),
                Arc::new(act_types.finish()),
                Arc::new(amounts.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_person_totals(&mut self, rows: &[PersonTotalRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.totals.as_mut() else {
            return Ok(());
        };

        let mut persons  = StringBuilder::new();
        let mut caused   = Float64Builder::new();
        let mut affected = Float64Builder::new();

        for row in rows {
            persons.append_value(&row.person);
            caused.append_value(row.caused);
            affected.append_value(row.affected);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.totals_schema),
            vec![
                Arc::new(persons.finish()),
                Arc::new(caused.finish()),
                Arc::new(affected.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        for slot in [&mut self.caused, &mut self.affected, &mut self.totals] {
            if let Some(w) = slot.take() {
                w.close()?;
            }
        }
        Ok(())
    }
}
