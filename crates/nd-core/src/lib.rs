//! `nd-core` — foundational types for the noise-damage cost engine.
//!
//! This crate is a dependency of every other `nd-*` crate.  It has no
//! `nd-*` dependencies and only `thiserror` (plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`ids`]       | `LinkId`, `ReceiverId`, `PersonId`, `VehicleId`         |
//! | [`time`]      | `TimeInterval`, `IntervalGrid`, `DayPeriod`             |
//! | [`vehicle`]   | `VehicleCategory` enum                                  |
//! | [`config`]    | `NoiseConfig`                                           |
//! | [`error`]     | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod time;
pub mod vehicle;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::NoiseConfig;
pub use error::{CoreError, CoreResult};
pub use ids::{LinkId, PersonId, ReceiverId, VehicleId};
pub use time::{DayPeriod, IntervalGrid, TimeInterval, SECS_PER_DAY};
pub use vehicle::VehicleCategory;
