//! Link-entry traffic per link and interval.

use std::collections::BTreeMap;

use nd_core::{LinkId, TimeInterval, VehicleCategory, VehicleId};

/// Vehicles that entered one link during one interval.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkEntries {
    /// Entering vehicles in entry order.
    pub vehicles: Vec<VehicleId>,
    /// Light-vehicle entries.
    pub cars: u32,
    /// Heavy-vehicle entries.
    pub hgvs: u32,
}

impl LinkEntries {
    #[inline]
    pub fn count(&self, category: VehicleCategory) -> u32 {
        match category {
            VehicleCategory::Car => self.cars,
            VehicleCategory::Hgv => self.hgvs,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cars == 0 && self.hgvs == 0
    }
}

/// Link-entry records keyed by `(link, interval)`.
///
/// Produced by the upstream emission tracker.  A missing key means no
/// vehicle entered that link in that interval.
#[derive(Clone, Debug, Default)]
pub struct LinkTraffic {
    entries: BTreeMap<(LinkId, TimeInterval), LinkEntries>,
}

impl LinkTraffic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one vehicle entering `link` during `interval`.
    pub fn record_entry(
        &mut self,
        link:     LinkId,
        interval: TimeInterval,
        vehicle:  VehicleId,
        category: VehicleCategory,
    ) {
        let slot = self.entries.entry((link, interval)).or_default();
        slot.vehicles.push(vehicle);
        match category {
            VehicleCategory::Car => slot.cars += 1,
            VehicleCategory::Hgv => slot.hgvs += 1,
        }
    }

    /// Store a pre-aggregated record, replacing any existing one.
    ///
    /// Counts are taken as given; they need not match `vehicles.len()` when
    /// the upstream tracker counts a sample differently from the id list.
    pub fn insert(&mut self, link: LinkId, interval: TimeInterval, entries: LinkEntries) {
        self.entries.insert((link, interval), entries);
    }

    pub fn get(&self, link: LinkId, interval: TimeInterval) -> Option<&LinkEntries> {
        self.entries.get(&(link, interval))
    }

    /// Entry count for one category; 0 if nothing was recorded.
    pub fn count(&self, link: LinkId, interval: TimeInterval, category: VehicleCategory) -> u32 {
        self.get(link, interval).map_or(0, |e| e.count(category))
    }

    /// All records, link-major then interval-minor.
    pub fn iter(&self) -> impl Iterator<Item = (LinkId, TimeInterval, &LinkEntries)> {
        self.entries.iter().map(|(&(link, interval), e)| (link, interval, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
