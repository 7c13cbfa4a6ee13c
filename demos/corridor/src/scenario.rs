//! Synthetic corridor inputs.
//!
//! Four links past three receiver points:
//!
//! ```text
//!   link 0  main road     80 km/h   heavy through traffic
//!   link 1  side street   50 km/h
//!   link 2  side street   50 km/h
//!   link 3  truck bypass  60 km/h   mostly lkw
//!
//!   receiver 0  houses on the main road
//!   receiver 1  houses between the side streets
//!   receiver 2  offices next to the bypass
//! ```
//!
//! Traffic follows a daily profile; receiver levels are a toy propagation
//! of the hourly emission energy with distance attenuation.  Only the
//! shape matters here, not acoustic accuracy.

use nd_core::{IntervalGrid, ReceiverId, VehicleCategory, VehicleId};
use nd_damage::equations::emission_level;
use nd_exposure::{LinkTraffic, ReceiverPoint, ReceiverSet};
use nd_network::LinkNetwork;

pub const LINKS_CSV: &str = "\
link_id,freespeed_ms\n\
0,22.22\n\
1,13.89\n\
2,13.89\n\
3,16.67\n\
";

// Open end_secs = at home until the end of the horizon.
pub const ACTIVITIES_CSV: &str = "\
receiver_id,person_id,act_number,act_type,start_secs,end_secs\n\
0,anna,0,home,0,27000\n\
0,anna,2,home,63000,\n\
0,ben,0,home,0,30600\n\
0,ben,2,home,59400,\n\
1,clara,0,home,0,25200\n\
1,clara,2,home,68400,\n\
1,dev,0,home,0,\n\
2,emil,1,work,28800,61200\n\
2,fatma,1,work,32400,64800\n\
";

/// Vehicles per hour at full load: `(cars, lkw)` per link.
const BASE_FLOW: [(u32, u32); 4] = [(120, 12), (30, 1), (25, 1), (20, 25)];

/// Fraction of full load for the hour ending at index + 1.
const DAILY_PROFILE: [f64; 24] = [
    0.10, 0.05, 0.05, 0.05, 0.10, 0.30, 0.70, 1.00, 0.90, 0.60, 0.50, 0.50,
    0.55, 0.50, 0.50, 0.60, 0.90, 1.00, 0.70, 0.50, 0.35, 0.25, 0.20, 0.15,
];

/// Receiver-to-link distances in metres, `[receiver][link]`.
const DISTANCE_M: [[f64; 4]; 3] = [
    [30.0, 80.0, 200.0, 400.0],
    [60.0, 40.0, 60.0, 300.0],
    [250.0, 150.0, 40.0, 50.0],
];

/// Hourly link entries following [`DAILY_PROFILE`] on every day of the grid.
pub fn build_traffic(network: &LinkNetwork, grid: &IntervalGrid, hgv_prefix: &str) -> LinkTraffic {
    let mut traffic = LinkTraffic::new();

    for link in network.links() {
        let (cars, lkw) = BASE_FLOW[link.index() % BASE_FLOW.len()];
        for interval in grid.iter() {
            let hour = ((interval.clock_secs() / 3_600) as usize + 23) % 24;
            let load = DAILY_PROFILE[hour];
            let n_car = (f64::from(cars) * load).round() as u32;
            let n_lkw = (f64::from(lkw) * load).round() as u32;

            for k in 0..n_car {
                let id = VehicleId::new(format!("car_{}_{}_{k}", link.0, interval.end_secs()));
                traffic.record_entry(link, interval, id, VehicleCategory::Car);
            }
            for k in 0..n_lkw {
                let id = VehicleId::new(format!("{hgv_prefix}_{}_{}_{k}", link.0, interval.end_secs()));
                traffic.record_entry(link, interval, id, VehicleCategory::Hgv);
            }
        }
    }
    traffic
}

/// Combined and isolated levels for the three receivers.
pub fn build_receivers(network: &LinkNetwork, grid: &IntervalGrid, traffic: &LinkTraffic) -> ReceiverSet {
    let mut set = ReceiverSet::new();

    for (r, distances) in DISTANCE_M.iter().enumerate() {
        let receiver = ReceiverId(r as u32);
        let mut point = ReceiverPoint::new(receiver);

        for interval in grid.iter() {
            let mut energy_sum = 0.0;
            for link in network.links() {
                let Some(v) = network.freespeed_kmh(link) else { continue };
                let energy: f64 = VehicleCategory::ALL
                    .iter()
                    .map(|&c| f64::from(traffic.count(link, interval, c)) * 10f64.powf(0.1 * emission_level(c, v)))
                    .sum();
                if energy == 0.0 {
                    continue;
                }
                let isolated = attenuate(energy, distances[link.index() % distances.len()]);
                point.set_isolated(interval, link, isolated);
                energy_sum += 10f64.powf(0.1 * isolated);
            }
            if energy_sum > 0.0 {
                point.set_immission(interval, 10.0 * energy_sum.log10());
            }
        }
        set.insert(point);
    }
    set
}

fn attenuate(energy: f64, distance_m: f64) -> f64 {
    10.0 * energy.log10() + 25.0 - 15.0 * distance_m.log10()
}
