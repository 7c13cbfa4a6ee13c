//! Unit and scenario tests for nd-damage.

use nd_core::{LinkId, NoiseConfig, PersonId, ReceiverId, TimeInterval};
use nd_exposure::{ActivityExposure, LinkTraffic, ReceiverPoint, ReceiverSet};
use nd_network::{LinkNetwork, LinkNetworkBuilder};

use crate::{
    AffectedCostEvent, CausedCostEvent, CostTotals, EventSink, FreeFlowSpeed,
    NoiseDamageCalculator, NoiseDamageCalculatorBuilder,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const H: u32 = 3_600;

fn iv(hour: u32) -> TimeInterval {
    TimeInterval(hour * H)
}

fn assert_close(actual: f64, expected: f64, rel: f64) {
    let scale = expected.abs().max(1e-12);
    assert!(
        ((actual - expected) / scale).abs() <= rel,
        "expected {expected}, got {actual} (rel tol {rel})"
    );
}

fn config() -> NoiseConfig {
    NoiseConfig { annual_cost_rate: 100.0, ..NoiseConfig::default() }
}

/// Three links: 50 km/h, 80 km/h, and an unused 30 km/h link.
fn network() -> LinkNetwork {
    let mut b = LinkNetworkBuilder::new();
    b.add_link(50.0 / 3.6);
    b.add_link(80.0 / 3.6);
    b.add_link(30.0 / 3.6);
    b.build()
}

fn receivers() -> ReceiverSet {
    let mut r0 = ReceiverPoint::new(ReceiverId(0));
    r0.set_immission(iv(8), 53.0);
    r0.set_isolated(iv(8), LinkId(0), 50.0);
    r0.set_isolated(iv(8), LinkId(1), 50.0);

    let mut r1 = ReceiverPoint::new(ReceiverId(1));
    r1.set_immission(iv(8), 60.0);
    r1.set_isolated(iv(8), LinkId(0), 57.0);
    r1.set_isolated(iv(8), LinkId(1), 56.0);
    r1.set_immission(iv(23), 45.0);
    r1.set_isolated(iv(23), LinkId(0), 45.0);

    [r0, r1].into_iter().collect()
}

fn exposure() -> ActivityExposure {
    let mut ex = ActivityExposure::new();
    ex.record(ReceiverId(0), PersonId::new("alice"), 0, "home", iv(8), 1.0);
    ex.record(ReceiverId(0), PersonId::new("bob"), 1, "work", iv(8), 1.0);
    ex.record(ReceiverId(1), PersonId::new("carol"), 0, "home", iv(8), 0.5);
    ex.record(ReceiverId(1), PersonId::new("carol"), 0, "home", iv(23), 1.0);
    ex
}

fn traffic() -> LinkTraffic {
    use nd_core::{VehicleCategory, VehicleId};

    let mut t = LinkTraffic::new();
    for (link, hour, id) in [
        (0, 8, "car_1"),
        (0, 8, "car_2"),
        (0, 8, "lkw_1"),
        (1, 8, "car_3"),
        (0, 23, "car_4"),
    ] {
        let vehicle = VehicleId::new(id);
        let category = VehicleCategory::of(&vehicle, "lkw");
        t.record_entry(LinkId(link), iv(hour), vehicle, category);
    }
    t
}

fn corridor(config: NoiseConfig) -> NoiseDamageCalculator<FreeFlowSpeed> {
    NoiseDamageCalculatorBuilder::new(config, FreeFlowSpeed)
        .network(network())
        .receivers(receivers())
        .traffic(traffic())
        .exposure(exposure())
        .build()
        .unwrap()
}

/// Sink that keeps everything it is handed.
#[derive(Default)]
struct RecordingSink {
    caused:   Vec<CausedCostEvent>,
    affected: Vec<AffectedCostEvent>,
    ends:     usize,
    totals:   Option<CostTotals>,
}

impl EventSink for RecordingSink {
    fn on_caused(&mut self, event: &CausedCostEvent) {
        self.caused.push(event.clone());
    }
    fn on_affected(&mut self, event: &AffectedCostEvent) {
        self.affected.push(event.clone());
    }
    fn on_run_end(&mut self, totals: &CostTotals) {
        self.ends += 1;
        self.totals = Some(totals.clone());
    }
}

// ── Equations ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod equations {
    use super::*;
    use crate::equations::*;
    use nd_core::{DayPeriod, VehicleCategory};

    #[test]
    fn loudness_weight_zero_below_threshold() {
        assert_eq!(loudness_weight(49.9, DayPeriod::Day), 0.0);
        assert_eq!(loudness_weight(44.9, DayPeriod::Evening), 0.0);
        assert_eq!(loudness_weight(39.9, DayPeriod::Night), 0.0);
    }

    #[test]
    fn loudness_weight_above_threshold() {
        assert_eq!(loudness_weight(50.0, DayPeriod::Day), 1.0);
        assert_close(loudness_weight(53.0, DayPeriod::Day), 1.231_144, 1e-6);
        assert_close(loudness_weight(50.0, DayPeriod::Night), 2.0, 1e-12);
    }

    #[test]
    fn damage_cost_prorates_to_interval() {
        let cost = damage_cost(100.0, 2.0 * 2f64.powf(0.3), 3_600.0 / 86_400.0);
        assert_close(cost, 0.028_108, 1e-4);
    }

    #[test]
    fn immission_share_of_three_db_gap() {
        assert_close(immission_share(50.0, 53.0), 0.501_187, 1e-5);
        assert_close(immission_share(60.0, 60.0), 1.0, 1e-12);
    }

    #[test]
    fn rls90_reference_levels() {
        assert_close(emission_level_car(50.0), 30.710_3, 1e-5);
        assert_close(emission_level_hgv(50.0), 44.337_1, 1e-5);
        assert_eq!(emission_level(VehicleCategory::Car, 80.0), emission_level_car(80.0));
        assert_eq!(emission_level(VehicleCategory::Hgv, 80.0), emission_level_hgv(80.0));
    }

    #[test]
    fn category_share_weights_by_energy() {
        // 3 cars at 70 dB, 1 hgv at 75 dB.
        let hgv = category_share(1, 75.0, 3, 70.0);
        let car = category_share(3, 70.0, 1, 75.0);
        let expected_hgv = 10f64.powf(7.5) / (3.0 * 10f64.powf(7.0) + 10f64.powf(7.5));
        assert_close(hgv, expected_hgv, 1e-12);
        assert_close(hgv, 0.513_167, 1e-5);
        assert!(hgv > car);
        assert_close(hgv + car, 1.0, 1e-12);
    }

    #[test]
    fn category_share_zero_counts() {
        assert_eq!(category_share(0, 70.0, 0, 75.0), 0.0);
        assert_eq!(category_share(0, 70.0, 2, 75.0), 0.0);
        assert_eq!(category_share(2, 70.0, 0, 75.0), 1.0);
    }
}

// ── Speed models ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod speed {
    use crate::{FreeFlowSpeed, HgvSpeedCap, SpeedModel};
    use nd_core::VehicleCategory;

    #[test]
    fn free_flow_is_identity() {
        assert_eq!(FreeFlowSpeed.speed_kmh(VehicleCategory::Car, 70.0), 70.0);
        assert_eq!(FreeFlowSpeed.speed_kmh(VehicleCategory::Hgv, 70.0), 70.0);
    }

    #[test]
    fn hgv_cap_only_limits_heavy() {
        let cap = HgvSpeedCap::new(80.0);
        assert_eq!(cap.speed_kmh(VehicleCategory::Car, 100.0), 100.0);
        assert_eq!(cap.speed_kmh(VehicleCategory::Hgv, 100.0), 80.0);
        assert_eq!(cap.speed_kmh(VehicleCategory::Hgv, 60.0), 60.0);
    }
}

// ── Stage 1: damage ───────────────────────────────────────────────────────────

#[cfg(test)]
mod damage {
    use super::*;
    use crate::compute_damage;

    #[test]
    fn day_scenario_cost() {
        let mut rp = ReceiverPoint::new(ReceiverId(0));
        rp.set_immission(iv(8), 53.0);
        let set: ReceiverSet = [rp].into_iter().collect();
        let mut ex = ActivityExposure::new();
        ex.add_affected_units(ReceiverId(0), iv(8), 2.0);

        let d = compute_damage(&set, &ex, &config()).unwrap();
        assert_close(d.cost(ReceiverId(0), iv(8)), 0.028_11, 1e-3);
        assert_close(d.cost_per_unit(ReceiverId(0), iv(8)).unwrap() * 2.0, d.cost(ReceiverId(0), iv(8)), 1e-12);
    }

    #[test]
    fn aggregate_equals_per_unit_times_units() {
        let report = corridor(config()).run(&mut crate::NoopSink).unwrap();
        let ex = exposure();
        for (&(r, t), &cost) in &report.damage.cost {
            let per_unit = report.damage.cost_per_unit(r, t).unwrap();
            assert_close(cost, per_unit * ex.affected_units(r, t), 1e-9);
        }
        assert_eq!(report.damage.len(), 3);
    }

    #[test]
    fn nobody_present_gives_zero_cost_but_unit_cost() {
        let mut rp = ReceiverPoint::new(ReceiverId(3));
        rp.set_immission(iv(12), 55.0);
        let set: ReceiverSet = [rp].into_iter().collect();

        let d = compute_damage(&set, &ActivityExposure::new(), &config()).unwrap();
        assert_eq!(d.cost(ReceiverId(3), iv(12)), 0.0);
        assert!(d.cost_per_unit(ReceiverId(3), iv(12)).unwrap() > 0.0);
    }

    #[test]
    fn below_threshold_costs_nothing() {
        let mut rp = ReceiverPoint::new(ReceiverId(0));
        rp.set_immission(iv(12), 49.9);
        let set: ReceiverSet = [rp].into_iter().collect();
        let mut ex = ActivityExposure::new();
        ex.add_affected_units(ReceiverId(0), iv(12), 10.0);

        let d = compute_damage(&set, &ex, &config()).unwrap();
        assert_eq!(d.cost(ReceiverId(0), iv(12)), 0.0);
        assert_eq!(d.cost_per_unit(ReceiverId(0), iv(12)), Some(0.0));
    }

    #[test]
    fn period_boundaries_pick_thresholds() {
        let mut rp = ReceiverPoint::new(ReceiverId(0));
        for h in [6, 18, 22] {
            rp.set_immission(iv(h), 50.0);
        }
        let set: ReceiverSet = [rp].into_iter().collect();
        let d = compute_damage(&set, &ActivityExposure::new(), &config()).unwrap();

        let at = |h| d.cost_per_unit(ReceiverId(0), iv(h)).unwrap();
        // 06:00 → night (40 dB), 18:00 → day (50 dB), 22:00 → evening (45 dB).
        assert_close(at(6) / at(18), 2.0, 1e-12);
        assert_close(at(22) / at(18), 2f64.sqrt(), 1e-12);
    }

    #[test]
    fn levels_outside_grid_ignored() {
        let mut rp = ReceiverPoint::new(ReceiverId(0));
        rp.set_immission(iv(31), 70.0);
        rp.set_immission(TimeInterval(1_800), 70.0);
        let set: ReceiverSet = [rp].into_iter().collect();
        let d = compute_damage(&set, &ActivityExposure::new(), &config()).unwrap();
        assert!(d.is_empty());
    }
}

// ── Stage 2: allocation ───────────────────────────────────────────────────────

#[cfg(test)]
mod allocation {
    use super::*;

    #[test]
    fn three_db_gap_takes_half() {
        let report = corridor(config()).run(&mut crate::NoopSink).unwrap();
        let share = report.allocation.share(ReceiverId(0), iv(8), LinkId(0)).unwrap();
        assert_close(share, 0.5012, 1e-4);
    }

    #[test]
    fn link_totals_conserve_receiver_contributions() {
        let report = corridor(config()).run(&mut crate::NoopSink).unwrap();

        for (&(link, t), &total) in &report.allocation.link_totals {
            let summed: f64 = report
                .allocation
                .shares
                .iter()
                .filter(|((_, st, sl), _)| *sl == link && *st == t)
                .map(|(&(r, st, _), &share)| share * report.damage.cost(r, st))
                .sum();
            if total == 0.0 {
                assert_eq!(summed, 0.0);
            } else {
                assert_close(summed, total, 1e-6);
            }
        }
    }

    #[test]
    fn every_link_interval_initialised() {
        let report = corridor(config()).run(&mut crate::NoopSink).unwrap();
        assert_eq!(report.allocation.link_totals.len(), 3 * 30);
        for t in config().grid().unwrap().iter() {
            assert_eq!(report.link_cost(LinkId(2), t), 0.0);
        }
        assert!(report.link_cost(LinkId(0), iv(8)) > 0.0);
    }

    #[test]
    fn single_source_takes_everything() {
        let report = corridor(config()).run(&mut crate::NoopSink).unwrap();
        // Receiver 1 at 23:00 hears only link 0 at the full level.
        assert_close(report.link_cost(LinkId(0), iv(23)), report.damage.cost(ReceiverId(1), iv(23)), 1e-12);
    }

    #[test]
    fn zero_cost_receivers_not_allocated() {
        let mut rp = ReceiverPoint::new(ReceiverId(0));
        rp.set_immission(iv(8), 60.0);
        rp.set_isolated(iv(8), LinkId(0), 60.0);
        let calc = NoiseDamageCalculatorBuilder::new(config(), FreeFlowSpeed)
            .network(network())
            .receivers([rp].into_iter().collect())
            .build()
            .unwrap();
        let report = calc.run(&mut crate::NoopSink).unwrap();
        assert!(report.allocation.shares.is_empty());
        assert_eq!(report.allocation.total(), 0.0);
    }
}

// ── Stage 3: split ────────────────────────────────────────────────────────────

#[cfg(test)]
mod split {
    use super::*;
    use crate::HgvSpeedCap;
    use nd_core::VehicleCategory;

    #[test]
    fn shares_sum_to_one_or_both_zero() {
        let report = corridor(config()).run(&mut crate::NoopSink).unwrap();
        let t = traffic();
        for link in network().links() {
            for i in config().grid().unwrap().iter() {
                let car = report.split.share(link, i, VehicleCategory::Car);
                let hgv = report.split.share(link, i, VehicleCategory::Hgv);
                let vehicles = t.count(link, i, VehicleCategory::Car) + t.count(link, i, VehicleCategory::Hgv);
                if vehicles == 0 {
                    assert_eq!((car, hgv), (0.0, 0.0));
                } else {
                    assert!((car + hgv - 1.0).abs() < 1e-3);
                }
            }
        }
    }

    #[test]
    fn per_vehicle_amounts_recover_link_total() {
        let report = corridor(config()).run(&mut crate::NoopSink).unwrap();
        let per_car = report.split.per_vehicle(LinkId(0), iv(8), VehicleCategory::Car);
        let per_hgv = report.split.per_vehicle(LinkId(0), iv(8), VehicleCategory::Hgv);
        assert_close(2.0 * per_car + per_hgv, report.link_cost(LinkId(0), iv(8)), 1e-9);
        assert!(per_hgv > per_car);
    }

    #[test]
    fn absent_category_gets_nothing() {
        let report = corridor(config()).run(&mut crate::NoopSink).unwrap();
        assert_eq!(report.split.per_vehicle(LinkId(1), iv(8), VehicleCategory::Hgv), 0.0);
        assert_eq!(report.split.share(LinkId(1), iv(8), VehicleCategory::Car), 1.0);
    }

    #[test]
    fn hgv_cap_lowers_heavy_share() {
        let free = corridor(config()).run(&mut crate::NoopSink).unwrap();
        let capped = NoiseDamageCalculatorBuilder::new(config(), HgvSpeedCap::new(30.0))
            .network(network())
            .receivers(receivers())
            .traffic(traffic())
            .exposure(exposure())
            .build()
            .unwrap()
            .run(&mut crate::NoopSink)
            .unwrap();
        let key = (LinkId(0), iv(8));
        assert!(
            capped.split.share(key.0, key.1, VehicleCategory::Hgv)
                < free.split.share(key.0, key.1, VehicleCategory::Hgv)
        );
    }

    #[test]
    fn degenerate_heavy_speed_ignored_without_heavy_vehicles() {
        let mut t = LinkTraffic::new();
        t.record_entry(LinkId(1), iv(8), nd_core::VehicleId::new("car_3"), VehicleCategory::Car);
        t.record_entry(LinkId(1), iv(8), nd_core::VehicleId::new("car_5"), VehicleCategory::Car);

        let report = NoiseDamageCalculatorBuilder::new(config(), HgvSpeedCap::new(0.0))
            .network(network())
            .receivers(receivers())
            .traffic(t)
            .exposure(exposure())
            .build()
            .unwrap()
            .run(&mut crate::NoopSink)
            .unwrap();

        assert_eq!(report.split.share(LinkId(1), iv(8), VehicleCategory::Car), 1.0);
        assert_eq!(report.split.share(LinkId(1), iv(8), VehicleCategory::Hgv), 0.0);
        assert_close(
            report.split.per_vehicle(LinkId(1), iv(8), VehicleCategory::Car),
            report.link_cost(LinkId(1), iv(8)) / 2.0,
            1e-12,
        );
        assert_close(report.total_caused(), report.link_cost(LinkId(1), iv(8)), 1e-12);
    }
}

// ── Stage 4: events ───────────────────────────────────────────────────────────

#[cfg(test)]
mod events {
    use super::*;
    use nd_core::VehicleCategory;

    #[test]
    fn caused_events_link_major_one_second_early() {
        let report = corridor(config()).run(&mut crate::NoopSink).unwrap();
        let order: Vec<_> = report
            .caused_events
            .iter()
            .map(|e| (e.link, e.vehicle.as_str(), e.time_secs))
            .collect();
        assert_eq!(order, vec![
            (LinkId(0), "car_1", 8 * H - 1),
            (LinkId(0), "car_2", 8 * H - 1),
            (LinkId(0), "lkw_1", 8 * H - 1),
            (LinkId(0), "car_4", 23 * H - 1),
            (LinkId(1), "car_3", 8 * H - 1),
        ]);
        let lkw = &report.caused_events[2];
        assert_eq!(lkw.category, VehicleCategory::Hgv);
        assert_eq!(lkw.person.as_str(), "lkw_1");
    }

    #[test]
    fn affected_events_receiver_major_at_interval_end() {
        let report = corridor(config()).run(&mut crate::NoopSink).unwrap();
        let order: Vec<_> = report
            .affected_events
            .iter()
            .map(|e| (e.receiver, e.person.as_str(), e.time_secs))
            .collect();
        assert_eq!(order, vec![
            (ReceiverId(0), "alice", 8 * H),
            (ReceiverId(0), "bob", 8 * H),
            (ReceiverId(1), "carol", 8 * H),
            (ReceiverId(1), "carol", 23 * H),
        ]);
        assert_eq!(report.affected_events[1].act_type, "work");
    }

    #[test]
    fn totals_reconcile_with_tables() {
        let report = corridor(config()).run(&mut crate::NoopSink).unwrap();
        assert_close(report.total_caused(), report.allocation.total(), 1e-9);
        assert_close(report.total_affected(), report.damage.total(), 1e-9);

        let per_person: f64 = report.totals.caused_by_person.values().sum();
        assert_close(per_person, report.total_caused(), 1e-12);
        let alice = PersonId::new("alice");
        assert_close(report.affected_cost(&alice), report.damage.cost(ReceiverId(0), iv(8)) / 2.0, 1e-9);
        assert_eq!(report.caused_cost(&alice), 0.0);
    }

    #[test]
    fn scale_factor_divides_caused_only() {
        let base = corridor(config()).run(&mut crate::NoopSink).unwrap();
        let scaled = corridor(NoiseConfig { scale_factor: 10.0, ..config() })
            .run(&mut crate::NoopSink)
            .unwrap();
        assert_close(scaled.total_caused(), base.total_caused() / 10.0, 1e-12);
        assert_close(scaled.total_affected(), base.total_affected(), 1e-12);
    }

    #[test]
    fn zero_amount_vehicles_still_emitted() {
        let mut t = traffic();
        t.record_entry(
            LinkId(2),
            iv(3),
            nd_core::VehicleId::new("car_9"),
            VehicleCategory::Car,
        );
        let calc = NoiseDamageCalculatorBuilder::new(config(), FreeFlowSpeed)
            .network(network())
            .receivers(receivers())
            .traffic(t)
            .exposure(exposure())
            .build()
            .unwrap();
        let report = calc.run(&mut crate::NoopSink).unwrap();
        let quiet: Vec<_> = report.caused_events.iter().filter(|e| e.link == LinkId(2)).collect();
        assert_eq!(quiet.len(), 1);
        assert_eq!(quiet[0].amount, 0.0);
    }

    #[test]
    fn affected_without_level_is_zero() {
        let mut ex = exposure();
        ex.record(ReceiverId(7), PersonId::new("dave"), 0, "home", iv(8), 1.0);
        let calc = NoiseDamageCalculatorBuilder::new(config(), FreeFlowSpeed)
            .network(network())
            .receivers(receivers())
            .exposure(ex)
            .build()
            .unwrap();
        let report = calc.run(&mut crate::NoopSink).unwrap();
        let dave: Vec<_> = report.affected_events.iter().filter(|e| e.person.as_str() == "dave").collect();
        assert_eq!(dave.len(), 1);
        assert_eq!(dave[0].amount, 0.0);
    }
}

// ── Whole runs ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod runs {
    use super::*;

    #[test]
    fn repeated_runs_are_identical() {
        let calc = corridor(config());
        let first = calc.run(&mut crate::NoopSink).unwrap();
        let second = calc.run(&mut crate::NoopSink).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn collect_off_streams_same_events() {
        let mut on_sink = RecordingSink::default();
        let on = corridor(config()).run(&mut on_sink).unwrap();

        let off_calc = NoiseDamageCalculatorBuilder::new(config(), FreeFlowSpeed)
            .network(network())
            .receivers(receivers())
            .traffic(traffic())
            .exposure(exposure())
            .collect_events(false)
            .build()
            .unwrap();
        let mut off_sink = RecordingSink::default();
        let off = off_calc.run(&mut off_sink).unwrap();

        assert!(off.caused_events.is_empty());
        assert!(off.affected_events.is_empty());
        assert_eq!(off.totals, on.totals);
        assert_eq!(off_sink.caused, on.caused_events);
        assert_eq!(off_sink.affected, on.affected_events);
        assert_eq!(on_sink.caused, on.caused_events);
    }

    #[test]
    fn run_end_fires_once_with_totals() {
        let mut sink = RecordingSink::default();
        let report = corridor(config()).run(&mut sink).unwrap();
        assert_eq!(sink.ends, 1);
        assert_eq!(sink.totals.as_ref(), Some(&report.totals));
    }

    #[test]
    fn empty_inputs_produce_empty_report() {
        let calc = NoiseDamageCalculatorBuilder::new(config(), FreeFlowSpeed).build().unwrap();
        let report = calc.run(&mut crate::NoopSink).unwrap();
        assert!(report.damage.is_empty());
        assert!(report.allocation.link_totals.is_empty());
        assert_eq!(report.total_caused(), 0.0);
        assert_eq!(report.total_affected(), 0.0);
    }
}

// ── Receiver ordering ─────────────────────────────────────────────────────────

#[cfg(test)]
mod receiver_order {
    use std::collections::BTreeMap;

    use super::*;
    use crate::equations::{damage_cost, immission_share, loudness_weight};

    /// Enough receivers for Rayon to split the slice across workers.
    fn many_receivers() -> (ReceiverSet, ActivityExposure) {
        let mut set = ReceiverSet::new();
        let mut ex = ActivityExposure::new();
        for r in 0..257u32 {
            let mut rp = ReceiverPoint::new(ReceiverId(r));
            for h in [7, 8, 19, 23] {
                let base = 48.0 + f64::from(r % 17) * 0.7 + f64::from(h % 5);
                rp.set_immission(iv(h), base + 3.0);
                rp.set_isolated(iv(h), LinkId(0), base + 0.3);
                rp.set_isolated(iv(h), LinkId(1), base - 1.1 + f64::from(r % 3));
                if r % 2 == 0 {
                    rp.set_isolated(iv(h), LinkId(2), base - 4.0);
                }
                ex.add_affected_units(ReceiverId(r), iv(h), 0.25 + f64::from(r % 7));
            }
            set.insert(rp);
        }
        (set, ex)
    }

    #[test]
    fn tables_match_receiver_ordered_fold() {
        let (set, ex) = many_receivers();
        let cfg = config();
        let grid = cfg.grid().unwrap();
        let calc = NoiseDamageCalculatorBuilder::new(cfg.clone(), FreeFlowSpeed)
            .network(network())
            .receivers(set.clone())
            .exposure(ex.clone())
            .build()
            .unwrap();
        let report = calc.run(&mut crate::NoopSink).unwrap();

        let mut link_totals: BTreeMap<(LinkId, TimeInterval), f64> = BTreeMap::new();
        for link in network().links() {
            for t in grid.iter() {
                link_totals.insert((link, t), 0.0);
            }
        }
        for point in set.iter() {
            for t in grid.iter() {
                let Some(level) = point.immission(t) else { continue };
                let weight = loudness_weight(level, t.period());
                let units = ex.affected_units(point.id, t);
                let cost = damage_cost(cfg.annual_cost_rate, weight * units, cfg.day_fraction());
                assert_eq!(report.damage.cost(point.id, t).to_bits(), cost.to_bits());
                if cost == 0.0 {
                    continue;
                }
                for (link, isolated) in point.isolated_at(t) {
                    let share = if isolated == 0.0 { 0.0 } else { immission_share(isolated, level) };
                    *link_totals.get_mut(&(link, t)).unwrap() += share * cost;
                }
            }
        }

        assert_eq!(report.allocation.link_totals.len(), link_totals.len());
        for (key, expected) in &link_totals {
            assert_eq!(report.allocation.link_totals[key].to_bits(), expected.to_bits(), "{key:?}");
        }
    }

    #[test]
    fn repeated_runs_bit_identical() {
        let (set, ex) = many_receivers();
        let calc = NoiseDamageCalculatorBuilder::new(config(), FreeFlowSpeed)
            .network(network())
            .receivers(set)
            .exposure(ex)
            .build()
            .unwrap();
        let first = calc.run(&mut crate::NoopSink).unwrap();
        for _ in 0..4 {
            assert_eq!(calc.run(&mut crate::NoopSink).unwrap(), first);
        }
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod errors {
    use super::*;
    use crate::DamageError;
    use nd_core::{CoreError, VehicleCategory, VehicleId};

    #[test]
    fn invalid_config_rejected_at_build() {
        let bad = NoiseConfig { interval_width_secs: 0, ..config() };
        let err = NoiseDamageCalculatorBuilder::new(bad, FreeFlowSpeed).build().err().unwrap();
        assert!(matches!(
            err,
            DamageError::Core(CoreError::Config { field: "interval_width_secs", .. })
        ));
    }

    #[test]
    fn non_finite_level_names_key() {
        let mut rp = ReceiverPoint::new(ReceiverId(4));
        rp.set_immission(iv(9), f64::NAN);
        let calc = NoiseDamageCalculatorBuilder::new(config(), FreeFlowSpeed)
            .receivers([rp].into_iter().collect())
            .build()
            .unwrap();
        let err = calc.run(&mut crate::NoopSink).unwrap_err();
        match err {
            DamageError::NonFiniteLevel { receiver, interval, .. } => {
                assert_eq!(receiver, ReceiverId(4));
                assert_eq!(interval, iv(9));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn receiver_citing_unknown_link() {
        let mut set = receivers();
        set.entry(ReceiverId(1)).set_isolated(iv(8), LinkId(9), 40.0);
        let calc = NoiseDamageCalculatorBuilder::new(config(), FreeFlowSpeed)
            .network(network())
            .receivers(set)
            .exposure(exposure())
            .build()
            .unwrap();
        let err = calc.run(&mut crate::NoopSink).unwrap_err();
        assert!(matches!(err, DamageError::UnknownLink { receiver: ReceiverId(1), link: LinkId(9) }));
        assert!(err.to_string().contains("LinkId(9)"));
    }

    #[test]
    fn traffic_on_unknown_link() {
        let mut t = traffic();
        t.record_entry(LinkId(5), iv(8), VehicleId::new("car_x"), VehicleCategory::Car);
        let calc = NoiseDamageCalculatorBuilder::new(config(), FreeFlowSpeed)
            .network(network())
            .traffic(t)
            .build()
            .unwrap();
        let err = calc.run(&mut crate::NoopSink).unwrap_err();
        assert!(matches!(err, DamageError::UnknownTrafficLink { link: LinkId(5), .. }));
    }

    // Link 0 carries lkw_1 at 08:00, so the heavy level must be evaluated.
    #[test]
    fn impossible_heavy_speed_names_link() {
        let calc = NoiseDamageCalculatorBuilder::new(config(), crate::HgvSpeedCap::new(0.0))
            .network(network())
            .receivers(receivers())
            .traffic(traffic())
            .exposure(exposure())
            .build()
            .unwrap();
        let err = calc.run(&mut crate::NoopSink).unwrap_err();
        assert!(matches!(
            err,
            DamageError::NonFiniteEmission { link: LinkId(0), category: VehicleCategory::Hgv, .. }
        ));
    }
}
