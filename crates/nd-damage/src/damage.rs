//! Stage 1: receiver damage cost.
//!
//! For each receiver and each grid interval with a recorded level:
//!
//! ```text
//! weight      = loudness_weight(level, period(interval))
//! equivalent  = weight · affected_units(receiver, interval)
//! cost        = rate · equivalent / 365 · (width / 86400)
//! per_unit    = rate · weight     / 365 · (width / 86400)
//! ```

use nd_core::{IntervalGrid, NoiseConfig, ReceiverId, TimeInterval};
use nd_exposure::{ActivityExposure, ReceiverPoint, ReceiverSet};
use tracing::info;

use crate::equations::{damage_cost, loudness_weight};
use crate::{DamageError, DamageResult};

#[cfg(feature = "fx-hash")]
pub type CostTable = rustc_hash::FxHashMap<(ReceiverId, TimeInterval), f64>;

#[cfg(not(feature = "fx-hash"))]
pub type CostTable = std::collections::HashMap<(ReceiverId, TimeInterval), f64>;

/// Output of [`compute_damage`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReceiverDamage {
    /// Aggregate cost over every affected unit present.
    pub cost: CostTable,

    /// Cost of one affected unit.  Defined even where nobody is present.
    pub cost_per_unit: CostTable,
}

impl ReceiverDamage {
    /// Aggregate cost; 0 if the key has no recorded level.
    #[inline]
    pub fn cost(&self, receiver: ReceiverId, interval: TimeInterval) -> f64 {
        self.cost.get(&(receiver, interval)).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn cost_per_unit(&self, receiver: ReceiverId, interval: TimeInterval) -> Option<f64> {
        self.cost_per_unit.get(&(receiver, interval)).copied()
    }

    /// Sum of every aggregate cost.
    pub fn total(&self) -> f64 {
        self.cost.values().sum()
    }

    pub fn len(&self) -> usize {
        self.cost.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cost.is_empty()
    }
}

/// One `(interval, cost, per_unit)` row for a single receiver.
type ReceiverRows = Vec<(TimeInterval, f64, f64)>;

/// Compute aggregate and per-unit damage for every receiver.
pub fn compute_damage(
    receivers: &ReceiverSet,
    exposure:  &ActivityExposure,
    config:    &NoiseConfig,
) -> DamageResult<ReceiverDamage> {
    info!("Calculating noise exposure costs for each receiver point...");
    let grid = config.grid()?;

    #[cfg(not(feature = "parallel"))]
    let rows: Vec<(ReceiverId, ReceiverRows)> = {
        let mut rows = Vec::with_capacity(receivers.len());
        for (counter, point) in receivers.iter().enumerate() {
            if counter > 0 && counter.is_multiple_of(10_000) {
                tracing::debug!("receiver point # {counter}");
            }
            rows.push((point.id, receiver_rows(point, exposure, config, &grid)?));
        }
        rows
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<(ReceiverId, ReceiverRows)> = {
        use rayon::prelude::*;

        receivers
            .as_slice()
            .par_iter()
            .map(|point| receiver_rows(point, exposure, config, &grid).map(|r| (point.id, r)))
            .collect::<DamageResult<Vec<_>>>()?
    };

    // Merge in receiver id order.
    let mut out = ReceiverDamage::default();
    for (receiver, receiver_rows) in rows {
        for (interval, cost, per_unit) in receiver_rows {
            out.cost.insert((receiver, interval), cost);
            out.cost_per_unit.insert((receiver, interval), per_unit);
        }
    }

    info!("Calculating noise exposure costs for each receiver point... Done.");
    Ok(out)
}

fn receiver_rows(
    point:    &ReceiverPoint,
    exposure: &ActivityExposure,
    config:   &NoiseConfig,
    grid:     &IntervalGrid,
) -> DamageResult<ReceiverRows> {
    let day_fraction = config.day_fraction();
    let mut rows = Vec::new();

    for interval in grid.iter() {
        let Some(level) = point.immission(interval) else {
            continue;
        };
        if !level.is_finite() {
            return Err(DamageError::NonFiniteLevel { receiver: point.id, interval, value: level });
        }

        let weight = loudness_weight(level, interval.period());
        let units = exposure.affected_units(point.id, interval);

        let cost = damage_cost(config.annual_cost_rate, weight * units, day_fraction);
        let per_unit = damage_cost(config.annual_cost_rate, weight, day_fraction);
        rows.push((interval, cost, per_unit));
    }
    Ok(rows)
}
