//! Population exposure: who is present at which receiver, and how much that
//! presence counts.
//!
//! # Affected agent units
//!
//! A person performing an activity at a receiver for the whole of an
//! interval contributes one unit; partial presence contributes the covered
//! fraction.  Units are kept at two granularities:
//!
//! ```text
//! (receiver, interval)                              → total units
//! (receiver, person, activity number, interval)     → units + activity type
//! ```
//!
//! The totals drive the receiver damage cost; the per-person entries drive
//! the affected-cost events.

use std::collections::BTreeMap;

use nd_core::{IntervalGrid, PersonId, ReceiverId, TimeInterval};

/// Composite key of one person's activity occurrence in one interval.
///
/// Field order defines iteration order: receiver-major, then person, then
/// activity number, then interval.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OccupancyKey {
    pub receiver:   ReceiverId,
    pub person:     PersonId,
    pub act_number: u32,
    pub interval:   TimeInterval,
}

/// Weight and type of one occupancy entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Occupancy {
    pub units:    f64,
    pub act_type: String,
}

/// Per-receiver, per-person activity exposure.
#[derive(Clone, Debug, Default)]
pub struct ActivityExposure {
    units:     BTreeMap<(ReceiverId, TimeInterval), f64>,
    occupancy: BTreeMap<OccupancyKey, Occupancy>,
}

impl ActivityExposure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `units` of presence for one activity occurrence in one
    /// interval and add them to the receiver total.
    pub fn record(
        &mut self,
        receiver:   ReceiverId,
        person:     PersonId,
        act_number: u32,
        act_type:   &str,
        interval:   TimeInterval,
        units:      f64,
    ) {
        *self.units.entry((receiver, interval)).or_insert(0.0) += units;

        let key = OccupancyKey { receiver, person, act_number, interval };
        self.occupancy
            .entry(key)
            .and_modify(|o| o.units += units)
            .or_insert_with(|| Occupancy { units, act_type: act_type.to_owned() });
    }

    /// Spread an activity spanning `[start_secs, end_secs)` across the grid.
    ///
    /// Each interval receives the covered fraction of its width.  An open
    /// end (`None`) runs to the grid horizon.  Portions outside the grid are
    /// dropped.
    #[allow(clippy::too_many_arguments)]
    pub fn record_activity(
        &mut self,
        receiver:   ReceiverId,
        person:     &PersonId,
        act_number: u32,
        act_type:   &str,
        start_secs: u32,
        end_secs:   Option<u32>,
        grid:       &IntervalGrid,
    ) {
        let end = end_secs.unwrap_or(grid.horizon_secs()).min(grid.horizon_secs());
        if end <= start_secs {
            return;
        }
        let width = f64::from(grid.width_secs());

        for interval in grid.iter() {
            let bucket_start = interval.start_secs(grid.width_secs());
            if bucket_start >= end {
                break;
            }
            let overlap_start = start_secs.max(bucket_start);
            let overlap_end = end.min(interval.end_secs());
            if overlap_end > overlap_start {
                let units = f64::from(overlap_end - overlap_start) / width;
                self.record(receiver, person.clone(), act_number, act_type, interval, units);
            }
        }
    }

    /// Add units to a receiver total without a per-person breakdown.
    pub fn add_affected_units(&mut self, receiver: ReceiverId, interval: TimeInterval, units: f64) {
        *self.units.entry((receiver, interval)).or_insert(0.0) += units;
    }

    /// Total units at `receiver` during `interval`; 0 if none recorded.
    #[inline]
    pub fn affected_units(&self, receiver: ReceiverId, interval: TimeInterval) -> f64 {
        self.units.get(&(receiver, interval)).copied().unwrap_or(0.0)
    }

    /// Per-occurrence entries in receiver-major order.
    pub fn occupancy(&self) -> impl Iterator<Item = (&OccupancyKey, &Occupancy)> {
        self.occupancy.iter()
    }

    pub fn occupancy_len(&self) -> usize {
        self.occupancy.len()
    }
}
