//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `caused_costs.csv`
//! - `affected_costs.csv`
//! - `person_totals.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AffectedRow, CausedRow, OutputResult, PersonTotalRow};

/// Writes cost output to three CSV files.
pub struct CsvWriter {
    caused:   Writer<File>,
    affected: Writer<File>,
    totals:   Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut caused = Writer::from_path(dir.join("caused_costs.csv"))?;
        caused.write_record(["time_secs", "person", "vehicle", "link_id", "category", "amount"])?;

        let mut affected = Writer::from_path(dir.join("affected_costs.csv"))?;
        affected.write_record(["time_secs", "person", "receiver_id", "act_type", "amount"])?;

        let mut totals = Writer::from_path(dir.join("person_totals.csv"))?;
        totals.write_record(["person", "caused", "affected"])?;

        Ok(Self { caused, affected, totals, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_caused(&mut self, rows: &[CausedRow]) -> OutputResult<()> {
        for row in rows {
            self.caused.write_record(&[
                row.time_secs.to_string(),
                row.person.clone(),
                row.vehicle.clone(),
                row.link_id.to_string(),
                row.category.to_owned(),
                row.amount.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_affected(&mut self, rows: &[AffectedRow]) -> OutputResult<()> {
        for row in rows {
            self.affected.write_record(&[
                row.time_secs.to_string(),
                row.person.clone(),
                row.receiver_id.to_string(),
                row.act_type.clone(),
                row.amount.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_person_totals(&mut self, rows: &[PersonTotalRow]) -> OutputResult<()> {
        for row in rows {
            self.totals.write_record(&[
                row.person.clone(),
                row.caused.to_string(),
                row.affected.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.caused.flush()?;
        self.affected.flush()?;
        self.totals.flush()?;
        Ok(())
    }
}
