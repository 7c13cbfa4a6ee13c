//! Stage 3: split link damage between vehicle categories and vehicles.
//!
//! ```text
//! L_c        = emission_level(c, speed_model(c, freespeed))
//! share_c    = n_c·10^(0.1·L_c) / Σ n·10^(0.1·L)
//! pool_c     = link_total · share_c
//! vehicle_c  = pool_c / n_c        (0 when n_c = 0)
//! ```

use std::collections::BTreeMap;

use nd_core::{IntervalGrid, LinkId, TimeInterval, VehicleCategory};
use nd_exposure::LinkTraffic;
use nd_network::LinkNetwork;
use tracing::{debug, info, warn};

use crate::allocation::LinkAllocation;
use crate::equations::{category_share, emission_level};
use crate::{DamageError, DamageResult, SpeedModel};

/// Shares outside this open interval are reported as a data-quality issue.
const SHARE_SUM_TOLERANCE: (f64, f64) = (0.999, 1.001);

/// Key of the per-category tables.
pub type CategoryKey = (LinkId, TimeInterval, VehicleCategory);

/// Output of [`split_by_vehicle_category`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategorySplit {
    /// Energy share of each category.
    pub shares: BTreeMap<CategoryKey, f64>,

    /// Cost borne by one vehicle of each category.
    pub per_vehicle: BTreeMap<CategoryKey, f64>,
}

impl CategorySplit {
    #[inline]
    pub fn share(&self, link: LinkId, interval: TimeInterval, category: VehicleCategory) -> f64 {
        self.shares.get(&(link, interval, category)).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn per_vehicle(&self, link: LinkId, interval: TimeInterval, category: VehicleCategory) -> f64 {
        self.per_vehicle.get(&(link, interval, category)).copied().unwrap_or(0.0)
    }
}

/// Split each link total between cars and heavy vehicles.
pub fn split_by_vehicle_category<S: SpeedModel>(
    allocation: &LinkAllocation,
    traffic:    &LinkTraffic,
    network:    &LinkNetwork,
    grid:       &IntervalGrid,
    speed:      &S,
) -> DamageResult<CategorySplit> {
    for (link, interval, _) in traffic.iter() {
        if !network.contains(link) {
            return Err(DamageError::UnknownTrafficLink { link, interval });
        }
    }

    info!("Calculating the vehicle-specific noise cost for each link and time bin...");
    let mut out = CategorySplit::default();

    for (counter, link) in network.links().enumerate() {
        if counter > 0 && counter.is_multiple_of(10_000) {
            debug!("link # {counter}");
        }
        let freespeed_kmh = network.link_freespeed_ms[link.index()] * 3.6;

        for interval in grid.iter() {
            let n_car = traffic.count(link, interval, VehicleCategory::Car);
            let n_hgv = traffic.count(link, interval, VehicleCategory::Hgv);

            if n_car == 0 && n_hgv == 0 {
                for category in VehicleCategory::ALL {
                    out.shares.insert((link, interval, category), 0.0);
                    out.per_vehicle.insert((link, interval, category), 0.0);
                }
                continue;
            }

            // An absent category carries no energy, so its level is never
            // evaluated.
            let l_car = match n_car {
                0 => 0.0,
                _ => level(speed, VehicleCategory::Car, freespeed_kmh, link, interval)?,
            };
            let l_hgv = match n_hgv {
                0 => 0.0,
                _ => level(speed, VehicleCategory::Hgv, freespeed_kmh, link, interval)?,
            };

            let share_car = category_share(n_car, l_car, n_hgv, l_hgv);
            let share_hgv = category_share(n_hgv, l_hgv, n_car, l_car);

            let sum = share_car + share_hgv;
            if sum <= SHARE_SUM_TOLERANCE.0 || sum >= SHARE_SUM_TOLERANCE.1 {
                warn!("{link}, interval {interval}: vehicle category shares sum to {sum}, not 1");
            }

            let total = allocation.link_cost(link, interval);
            for (category, share, count) in [
                (VehicleCategory::Car, share_car, n_car),
                (VehicleCategory::Hgv, share_hgv, n_hgv),
            ] {
                let per_vehicle = if count > 0 { total * share / f64::from(count) } else { 0.0 };
                out.shares.insert((link, interval, category), share);
                out.per_vehicle.insert((link, interval, category), per_vehicle);
            }
        }
    }

    info!("Calculating the vehicle-specific noise cost for each link and time bin... Done.");
    Ok(out)
}

fn level<S: SpeedModel>(
    speed:         &S,
    category:      VehicleCategory,
    freespeed_kmh: f64,
    link:          LinkId,
    interval:      TimeInterval,
) -> DamageResult<f64> {
    let value = emission_level(category, speed.speed_kmh(category, freespeed_kmh));
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DamageError::NonFiniteEmission { link, interval, category, value })
    }
}
