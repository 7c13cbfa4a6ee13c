//! Plain data row types written by output backends.

use std::collections::BTreeSet;

use nd_damage::{AffectedCostEvent, CausedCostEvent, CostTotals};

/// One caused-cost event.
#[derive(Debug, Clone, PartialEq)]
pub struct CausedRow {
    pub time_secs: u32,
    pub person:    String,
    pub vehicle:   String,
    pub link_id:   u32,
    /// `"car"` or `"hgv"`.
    pub category:  &'static str,
    pub amount:    f64,
}

impl From<&CausedCostEvent> for CausedRow {
    fn from(e: &CausedCostEvent) -> Self {
        Self {
            time_secs: e.time_secs,
            person:    e.person.as_str().to_owned(),
            vehicle:   e.vehicle.as_str().to_owned(),
            link_id:   e.link.0,
            category:  e.category.as_str(),
            amount:    e.amount,
        }
    }
}

/// One affected-cost event.
#[derive(Debug, Clone, PartialEq)]
pub struct AffectedRow {
    pub time_secs:   u32,
    pub person:      String,
    pub receiver_id: u32,
    pub act_type:    String,
    pub amount:      f64,
}

impl From<&AffectedCostEvent> for AffectedRow {
    fn from(e: &AffectedCostEvent) -> Self {
        Self {
            time_secs:   e.time_secs,
            person:      e.person.as_str().to_owned(),
            receiver_id: e.receiver.0,
            act_type:    e.act_type.clone(),
            amount:      e.amount,
        }
    }
}

/// Cumulative costs of one person over the whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonTotalRow {
    pub person:   String,
    pub caused:   f64,
    pub affected: f64,
}

/// One row per person that caused or suffered any cost, sorted by id.
pub fn person_total_rows(totals: &CostTotals) -> Vec<PersonTotalRow> {
    let people: BTreeSet<_> = totals
        .caused_by_person
        .keys()
        .chain(totals.affected_by_person.keys())
        .collect();

    people
        .into_iter()
        .map(|p| PersonTotalRow {
            person:   p.as_str().to_owned(),
            caused:   totals.caused(p),
            affected: totals.affected(p),
        })
        .collect()
}
