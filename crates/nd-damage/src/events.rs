//! Cost events and the per-run accumulator.

use std::collections::BTreeMap;

use nd_core::{LinkId, PersonId, ReceiverId, VehicleCategory, VehicleId};

/// Damage attributed to the vehicle (and its driver) that entered a link.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CausedCostEvent {
    /// Seconds since midnight; one second before the interval end.
    pub time_secs: u32,
    pub person:    PersonId,
    pub vehicle:   VehicleId,
    pub link:      LinkId,
    pub category:  VehicleCategory,
    pub amount:    f64,
}

/// Damage suffered by a person during one activity in one interval.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffectedCostEvent {
    /// Seconds since midnight; the interval end.
    pub time_secs: u32,
    pub person:    PersonId,
    pub receiver:  ReceiverId,
    pub act_type:  String,
    pub amount:    f64,
}

/// Running per-person and global sums for one run.
///
/// Built fresh by every [`emit_events`](crate::emit_events) call and
/// returned with the report.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostTotals {
    pub caused_by_person:   BTreeMap<PersonId, f64>,
    pub affected_by_person: BTreeMap<PersonId, f64>,
    pub total_caused:       f64,
    pub total_affected:     f64,
}

impl CostTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_caused(&mut self, person: &PersonId, amount: f64) {
        *self.caused_by_person.entry(person.clone()).or_insert(0.0) += amount;
        self.total_caused += amount;
    }

    pub fn add_affected(&mut self, person: &PersonId, amount: f64) {
        *self.affected_by_person.entry(person.clone()).or_insert(0.0) += amount;
        self.total_affected += amount;
    }

    /// Cumulative caused cost of `person`; 0 if they caused none.
    pub fn caused(&self, person: &PersonId) -> f64 {
        self.caused_by_person.get(person).copied().unwrap_or(0.0)
    }

    /// Cumulative affected cost of `person`; 0 if they suffered none.
    pub fn affected(&self, person: &PersonId) -> f64 {
        self.affected_by_person.get(person).copied().unwrap_or(0.0)
    }
}
