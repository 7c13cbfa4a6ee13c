//! Stage 4: replay per-vehicle and per-person costs as events.
//!
//! # Emission order
//!
//! ```text
//! caused:    link → interval → vehicle (entry order)
//! affected:  receiver → person → activity number → interval
//! ```
//!
//! Every event goes to the sink.  With `collect_events` set, events are
//! also kept in the returned lists; totals are identical either way.

use nd_core::{IntervalGrid, NoiseConfig, VehicleCategory};
use nd_exposure::{ActivityExposure, LinkTraffic};
use tracing::{info, warn};

use crate::damage::ReceiverDamage;
use crate::split::CategorySplit;
use crate::{AffectedCostEvent, CausedCostEvent, CostTotals, EventSink};

/// Output of [`emit_events`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmittedEvents {
    /// Empty unless `collect_events` is set.
    pub caused:   Vec<CausedCostEvent>,
    /// Empty unless `collect_events` is set.
    pub affected: Vec<AffectedCostEvent>,
    pub totals:   CostTotals,
}

/// Emit caused and affected cost events into `sink`.
pub fn emit_events<K: EventSink>(
    split:    &CategorySplit,
    traffic:  &LinkTraffic,
    exposure: &ActivityExposure,
    damage:   &ReceiverDamage,
    config:   &NoiseConfig,
    grid:     &IntervalGrid,
    sink:     &mut K,
) -> EmittedEvents {
    let mut out = EmittedEvents::default();
    emit_caused(split, traffic, config, grid, sink, &mut out);
    emit_affected(exposure, damage, config, grid, sink, &mut out);
    sink.on_run_end(&out.totals);
    out
}

fn emit_caused<K: EventSink>(
    split:   &CategorySplit,
    traffic: &LinkTraffic,
    config:  &NoiseConfig,
    grid:    &IntervalGrid,
    sink:    &mut K,
    out:     &mut EmittedEvents,
) {
    info!("Throwing noise events for the causing agents...");

    for (link, interval, entries) in traffic.iter() {
        if !grid.contains(interval) {
            continue;
        }
        let time_secs = interval.end_secs().saturating_sub(1);

        for vehicle in &entries.vehicles {
            let category = VehicleCategory::of(vehicle, &config.hgv_id_prefix);
            let amount = split.per_vehicle(link, interval, category) / config.scale_factor;
            let event = CausedCostEvent {
                time_secs,
                person: vehicle.driver(),
                vehicle: vehicle.clone(),
                link,
                category,
                amount,
            };

            out.totals.add_caused(&event.person, amount);
            sink.on_caused(&event);
            if config.collect_events {
                out.caused.push(event);
            }
        }
    }
    info!("Throwing noise events for the causing agents... Done.");
}

fn emit_affected<K: EventSink>(
    exposure: &ActivityExposure,
    damage:   &ReceiverDamage,
    config:   &NoiseConfig,
    grid:     &IntervalGrid,
    sink:     &mut K,
    out:      &mut EmittedEvents,
) {
    info!("Throwing noise events for the affected agents...");

    for (key, occupancy) in exposure.occupancy() {
        if occupancy.units == 0.0 || !grid.contains(key.interval) {
            continue;
        }
        let per_unit = match damage.cost_per_unit(key.receiver, key.interval) {
            Some(c) => c,
            None => {
                warn!(
                    "{} has no noise level in interval {}; affected cost for {} is 0",
                    key.receiver, key.interval, key.person
                );
                0.0
            }
        };

        let amount = occupancy.units * per_unit;
        let event = AffectedCostEvent {
            time_secs: key.interval.end_secs(),
            person:    key.person.clone(),
            receiver:  key.receiver,
            act_type:  occupancy.act_type.clone(),
            amount,
        };

        out.totals.add_affected(&event.person, amount);
        sink.on_affected(&event);
        if config.collect_events {
            out.affected.push(event);
        }
    }
    info!("Throwing noise events for the affected agents... Done.");
}
