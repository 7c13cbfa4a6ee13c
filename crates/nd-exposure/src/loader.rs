//! CSV loaders for the three upstream collaborators.
//!
//! # CSV formats
//!
//! Receiver levels (combined immission):
//!
//! ```csv
//! receiver_id,interval_end,level_db
//! 0,28800,53.0
//! ```
//!
//! Isolated per-link contributions:
//!
//! ```csv
//! receiver_id,interval_end,link_id,level_db
//! 0,28800,3,50.0
//! ```
//!
//! Link entries (category is derived from the vehicle id prefix):
//!
//! ```csv
//! link_id,interval_end,vehicle_id
//! 3,28800,car_17
//! 3,28800,lkw_2
//! ```
//!
//! Activities (an empty `end_secs` means "until the end of the horizon"):
//!
//! ```csv
//! receiver_id,person_id,act_number,act_type,start_secs,end_secs
//! 0,p1,0,home,0,25200
//! 0,p1,2,home,64800,
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use nd_core::{IntervalGrid, LinkId, PersonId, ReceiverId, TimeInterval, VehicleCategory, VehicleId};

use crate::{ActivityExposure, ExposureError, ExposureResult, LinkTraffic, ReceiverSet};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LevelRecord {
    receiver_id:  u32,
    interval_end: u32,
    level_db:     f64,
}

#[derive(Deserialize)]
struct IsolatedRecord {
    receiver_id:  u32,
    interval_end: u32,
    link_id:      u32,
    level_db:     f64,
}

#[derive(Deserialize)]
struct EntryRecord {
    link_id:      u32,
    interval_end: u32,
    vehicle_id:   String,
}

#[derive(Deserialize)]
struct ActivityRecord {
    receiver_id: u32,
    person_id:   String,
    act_number:  u32,
    act_type:    String,
    start_secs:  u32,
    end_secs:    Option<u32>,
}

fn parse_err(e: csv::Error) -> ExposureError {
    ExposureError::Parse(e.to_string())
}

// ── Receivers ─────────────────────────────────────────────────────────────────

/// Load receiver points from a levels file and an isolated-contribution file.
pub fn load_receivers_csv(levels: &Path, isolated: &Path) -> ExposureResult<ReceiverSet> {
    let levels = std::fs::File::open(levels)?;
    let isolated = std::fs::File::open(isolated)?;
    load_receivers_reader(levels, isolated)
}

/// Like [`load_receivers_csv`] but accepts any `Read` sources.
pub fn load_receivers_reader<L: Read, I: Read>(levels: L, isolated: I) -> ExposureResult<ReceiverSet> {
    let mut set = ReceiverSet::new();

    let mut rdr = csv::Reader::from_reader(levels);
    for result in rdr.deserialize::<LevelRecord>() {
        let row = result.map_err(parse_err)?;
        set.entry(ReceiverId(row.receiver_id))
            .set_immission(TimeInterval(row.interval_end), row.level_db);
    }

    let mut rdr = csv::Reader::from_reader(isolated);
    for result in rdr.deserialize::<IsolatedRecord>() {
        let row = result.map_err(parse_err)?;
        set.entry(ReceiverId(row.receiver_id)).set_isolated(
            TimeInterval(row.interval_end),
            LinkId(row.link_id),
            row.level_db,
        );
    }

    Ok(set)
}

// ── Traffic ───────────────────────────────────────────────────────────────────

/// Load link entries; vehicles whose id starts with `hgv_prefix` are heavy.
pub fn load_traffic_csv(path: &Path, hgv_prefix: &str) -> ExposureResult<LinkTraffic> {
    let file = std::fs::File::open(path)?;
    load_traffic_reader(file, hgv_prefix)
}

/// Like [`load_traffic_csv`] but accepts any `Read` source.
pub fn load_traffic_reader<R: Read>(reader: R, hgv_prefix: &str) -> ExposureResult<LinkTraffic> {
    let mut traffic = LinkTraffic::new();
    let mut rdr = csv::Reader::from_reader(reader);

    for result in rdr.deserialize::<EntryRecord>() {
        let row = result.map_err(parse_err)?;
        let vehicle = VehicleId::new(row.vehicle_id);
        let category = VehicleCategory::of(&vehicle, hgv_prefix);
        traffic.record_entry(LinkId(row.link_id), TimeInterval(row.interval_end), vehicle, category);
    }

    Ok(traffic)
}

// ── Activities ────────────────────────────────────────────────────────────────

/// Load activities and spread them across `grid`.
pub fn load_activities_csv(path: &Path, grid: &IntervalGrid) -> ExposureResult<ActivityExposure> {
    let file = std::fs::File::open(path)?;
    load_activities_reader(file, grid)
}

/// Like [`load_activities_csv`] but accepts any `Read` source.
pub fn load_activities_reader<R: Read>(reader: R, grid: &IntervalGrid) -> ExposureResult<ActivityExposure> {
    let mut exposure = ActivityExposure::new();
    let mut rdr = csv::Reader::from_reader(reader);

    for result in rdr.deserialize::<ActivityRecord>() {
        let row = result.map_err(parse_err)?;
        if let Some(end) = row.end_secs {
            if end < row.start_secs {
                return Err(ExposureError::Parse(format!(
                    "activity {} of person {} ends ({end}) before it starts ({})",
                    row.act_number, row.person_id, row.start_secs
                )));
            }
        }
        exposure.record_activity(
            ReceiverId(row.receiver_id),
            &PersonId::new(row.person_id),
            row.act_number,
            &row.act_type,
            row.start_secs,
            row.end_secs,
            grid,
        );
    }

    Ok(exposure)
}
