//! The `NoiseDamageCalculator` and the report it returns.

use nd_core::{LinkId, NoiseConfig, PersonId, TimeInterval};
use nd_exposure::{ActivityExposure, LinkTraffic, ReceiverSet};
use nd_network::LinkNetwork;

use crate::allocation::{allocate_to_links, LinkAllocation};
use crate::damage::{compute_damage, ReceiverDamage};
use crate::emit::{emit_events, EmittedEvents};
use crate::split::{split_by_vehicle_category, CategorySplit};
use crate::{AffectedCostEvent, CausedCostEvent, CostTotals, DamageResult, EventSink, SpeedModel};

// ── DamageReport ──────────────────────────────────────────────────────────────

/// Everything one run produced.
///
/// The intermediate tables are kept for inspection and reporting; nothing
/// downstream recomputes from them.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageReport {
    pub damage:          ReceiverDamage,
    pub allocation:      LinkAllocation,
    pub split:           CategorySplit,
    pub caused_events:   Vec<CausedCostEvent>,
    pub affected_events: Vec<AffectedCostEvent>,
    pub totals:          CostTotals,
}

impl DamageReport {
    /// Cumulative caused cost of `person`.
    pub fn caused_cost(&self, person: &PersonId) -> f64 {
        self.totals.caused(person)
    }

    /// Cumulative affected cost of `person`.
    pub fn affected_cost(&self, person: &PersonId) -> f64 {
        self.totals.affected(person)
    }

    pub fn total_caused(&self) -> f64 {
        self.totals.total_caused
    }

    pub fn total_affected(&self) -> f64 {
        self.totals.total_affected
    }

    /// Damage cost attributed to `link` in `interval`.
    pub fn link_cost(&self, link: LinkId, interval: TimeInterval) -> f64 {
        self.allocation.link_cost(link, interval)
    }
}

// ── NoiseDamageCalculator ─────────────────────────────────────────────────────

/// Runs the four-stage damage pipeline over a fixed set of inputs.
///
/// ```text
/// ① compute_damage            receivers + exposure  → ReceiverDamage
/// ② allocate_to_links         receivers + ①         → LinkAllocation
/// ③ split_by_vehicle_category ② + traffic + network → CategorySplit
/// ④ emit_events               ③ + traffic, exposure + ① → events, totals
/// ```
///
/// The inputs are never mutated, so [`run`](Self::run) can be called any
/// number of times and always starts from fresh accumulators.
///
/// Create via [`NoiseDamageCalculatorBuilder`][crate::NoiseDamageCalculatorBuilder].
pub struct NoiseDamageCalculator<S: SpeedModel> {
    /// Validated run configuration.
    pub config: NoiseConfig,

    /// Links that may carry traffic; bounds every per-link table.
    pub network: LinkNetwork,

    /// Combined and isolated immission levels per receiver.
    pub receivers: ReceiverSet,

    /// Vehicles entering each link per interval.
    pub traffic: LinkTraffic,

    /// Affected agent units per receiver and per person activity.
    pub exposure: ActivityExposure,

    /// Per-category speed strategy for emission levels.
    pub speed: S,
}

impl<S: SpeedModel> NoiseDamageCalculator<S> {
    /// Run all stages, streaming events into `sink`.
    ///
    /// Any fatal error aborts the run; no partial report is returned.
    pub fn run<K: EventSink>(&self, sink: &mut K) -> DamageResult<DamageReport> {
        let grid = self.config.grid()?;

        let damage = compute_damage(&self.receivers, &self.exposure, &self.config)?;
        let allocation = allocate_to_links(&self.receivers, &damage, &self.network, &grid)?;
        let split = split_by_vehicle_category(
            &allocation,
            &self.traffic,
            &self.network,
            &grid,
            &self.speed,
        )?;
        let EmittedEvents { caused, affected, totals } = emit_events(
            &split,
            &self.traffic,
            &self.exposure,
            &damage,
            &self.config,
            &grid,
            sink,
        );

        Ok(DamageReport {
            damage,
            allocation,
            split,
            caused_events: caused,
            affected_events: affected,
            totals,
        })
    }
}
