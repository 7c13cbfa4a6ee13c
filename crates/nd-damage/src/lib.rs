//! `nd-damage` — the noise-damage cost pipeline.
//!
//! # Four-stage pipeline
//!
//! ```text
//!   ① Damage      per (receiver, interval): loudness weight × affected
//!                  units → aggregate and per-unit cost.
//!   ② Allocation  per (receiver, interval, link): energy share of the
//!                  isolated level → summed per (link, interval).
//!   ③ Split       per (link, interval, category): count-weighted energy
//!                  share → per-vehicle cost.
//!   ④ Emit        caused events per vehicle entry, affected events per
//!                  person activity; running totals.
//! ```
//!
//! Each stage only reads the previous stages' output.  Tables use flat
//! composite keys, so every conservation law is checkable by iterating one
//! map.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Runs stages ① and ② on Rayon's thread pool.               |
//! | `fx-hash`  | Uses `FxHashMap` for the receiver cost tables.            |
//! | `serde`    | Serialize/Deserialize on events and `CostTotals`.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use nd_core::NoiseConfig;
//! use nd_damage::{FreeFlowSpeed, NoiseDamageCalculatorBuilder, NoopSink};
//!
//! let calc = NoiseDamageCalculatorBuilder::new(NoiseConfig::default(), FreeFlowSpeed)
//!     .network(network)
//!     .receivers(receivers)
//!     .traffic(traffic)
//!     .exposure(exposure)
//!     .build()?;
//! let report = calc.run(&mut NoopSink)?;
//! println!("caused: {:.2}", report.total_caused());
//! ```

pub mod allocation;
pub mod builder;
pub mod calculator;
pub mod damage;
pub mod emit;
pub mod equations;
pub mod error;
pub mod events;
pub mod sink;
pub mod speed;
pub mod split;

#[cfg(test)]
mod tests;

pub use allocation::{allocate_to_links, LinkAllocation};
pub use builder::NoiseDamageCalculatorBuilder;
pub use calculator::{DamageReport, NoiseDamageCalculator};
pub use damage::{compute_damage, CostTable, ReceiverDamage};
pub use emit::{emit_events, EmittedEvents};
pub use error::{DamageError, DamageResult};
pub use events::{AffectedCostEvent, CausedCostEvent, CostTotals};
pub use sink::{EventSink, NoopSink};
pub use speed::{FreeFlowSpeed, HgvSpeedCap, SpeedModel};
pub use split::{split_by_vehicle_category, CategoryKey, CategorySplit};
