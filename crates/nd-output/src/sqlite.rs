//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `noise_costs.db` file in the configured output
//! directory with three tables: `caused_costs`, `affected_costs`, and
//! `person_totals`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{AffectedRow, CausedRow, OutputResult, PersonTotalRow};

/// Writes cost output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `noise_costs.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("noise_costs.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS caused_costs (
                 time_secs INTEGER NOT NULL,
                 person    TEXT    NOT NULL,
                 vehicle   TEXT    NOT NULL,
                 link_id   INTEGER NOT NULL,
                 category  TEXT    NOT NULL,
                 amount    REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS affected_costs (
                 time_secs   INTEGER NOT NULL,
                 person      TEXT    NOT NULL,
                 receiver_id INTEGER NOT NULL,
                 act_type    TEXT    NOT NULL,
                 amount      REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS person_totals (
                 person   TEXT PRIMARY KEY,
                 caused   REAL NOT NULL,
                 affected REAL NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_caused(&mut self, rows: &[CausedRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO caused_costs \
                 (time_secs, person, vehicle, link_id, category, amount) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.time_secs,
                    row.person,
                    row.vehicle,
                    row.link_id,
                    row.category,
                    row.amount,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_affected(&mut self, rows: &[AffectedRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO affected_costs \
                 (time_secs, person, receiver_id, act_type, amount) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.time_secs,
                    row.person,
                    row.receiver_id,
                    row.act_type,
                    row.amount,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_person_totals(&mut self, rows: &[PersonTotalRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO person_totals (person, caused, affected) \
                 VALUES (?1, ?2, ?3)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.person, row.caused, row.affected])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
