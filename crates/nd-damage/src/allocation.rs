//! Stage 2: redistribute receiver damage to the links that caused it.
//!
//! For every receiver interval with a non-zero cost, each cited link gets
//!
//! ```text
//! share        = 10^(0.1·isolated) / 10^(0.1·resulting)
//! contribution = share · cost(receiver, interval)
//! ```
//!
//! and contributions are summed per `(link, interval)`.  Every network link
//! has an entry for every grid interval, 0 where nothing contributed.

use std::collections::BTreeMap;

use nd_core::{IntervalGrid, LinkId, ReceiverId, TimeInterval};
use nd_exposure::{ReceiverPoint, ReceiverSet};
use nd_network::LinkNetwork;
use tracing::info;

use crate::damage::ReceiverDamage;
use crate::equations::immission_share;
use crate::{DamageError, DamageResult};

/// Output of [`allocate_to_links`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkAllocation {
    /// Immission share of each cited link at each costed receiver interval.
    pub shares: BTreeMap<(ReceiverId, TimeInterval, LinkId), f64>,

    /// Damage cost caused by each link in each interval.
    pub link_totals: BTreeMap<(LinkId, TimeInterval), f64>,
}

impl LinkAllocation {
    /// Total for `(link, interval)`; 0 if the key is absent.
    #[inline]
    pub fn link_cost(&self, link: LinkId, interval: TimeInterval) -> f64 {
        self.link_totals.get(&(link, interval)).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn share(&self, receiver: ReceiverId, interval: TimeInterval, link: LinkId) -> Option<f64> {
        self.shares.get(&(receiver, interval, link)).copied()
    }

    /// Sum over every link and interval.
    pub fn total(&self) -> f64 {
        self.link_totals.values().sum()
    }
}

/// One `(interval, link, share, contribution)` row for a single receiver.
type ShareRows = Vec<(TimeInterval, LinkId, f64, f64)>;

/// Allocate receiver costs to links by energy share.
pub fn allocate_to_links(
    receivers: &ReceiverSet,
    damage:    &ReceiverDamage,
    network:   &LinkNetwork,
    grid:      &IntervalGrid,
) -> DamageResult<LinkAllocation> {
    info!("Allocating the total exposure cost (per receiver point) to the relevant links...");

    #[cfg(not(feature = "parallel"))]
    let rows: Vec<(ReceiverId, ShareRows)> = {
        let mut rows = Vec::with_capacity(receivers.len());
        for (counter, point) in receivers.iter().enumerate() {
            if counter > 0 && counter.is_multiple_of(10_000) {
                tracing::debug!("receiver point # {counter}");
            }
            rows.push((point.id, receiver_shares(point, damage, network, grid)?));
        }
        rows
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<(ReceiverId, ShareRows)> = {
        use rayon::prelude::*;

        receivers
            .as_slice()
            .par_iter()
            .map(|point| receiver_shares(point, damage, network, grid).map(|r| (point.id, r)))
            .collect::<DamageResult<Vec<_>>>()?
    };

    let mut out = LinkAllocation::default();
    for link in network.links() {
        for interval in grid.iter() {
            out.link_totals.insert((link, interval), 0.0);
        }
    }

    // Merge in receiver id order so the float sums match the sequential path.
    for (receiver, share_rows) in rows {
        for (interval, link, share, contribution) in share_rows {
            out.shares.insert((receiver, interval, link), share);
            *out.link_totals.entry((link, interval)).or_insert(0.0) += contribution;
        }
    }

    info!("Allocating the total exposure cost (per receiver point) to the relevant links... Done.");
    Ok(out)
}

fn receiver_shares(
    point:   &ReceiverPoint,
    damage:  &ReceiverDamage,
    network: &LinkNetwork,
    grid:    &IntervalGrid,
) -> DamageResult<ShareRows> {
    for link in point.relevant_links() {
        if !network.contains(link) {
            return Err(DamageError::UnknownLink { receiver: point.id, link });
        }
    }

    let mut rows = Vec::new();
    for interval in grid.iter() {
        let cost = damage.cost(point.id, interval);
        if cost == 0.0 {
            continue;
        }
        // A non-zero cost implies a recorded level.
        let Some(resulting) = point.immission(interval) else {
            continue;
        };

        for (link, isolated) in point.isolated_at(interval) {
            if !isolated.is_finite() {
                return Err(DamageError::NonFiniteLevel {
                    receiver: point.id,
                    interval,
                    value:    isolated,
                });
            }
            let share = if isolated == 0.0 { 0.0 } else { immission_share(isolated, resulting) };
            rows.push((interval, link, share, share * cost));
        }
    }
    Ok(rows)
}
