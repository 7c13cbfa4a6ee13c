//! `nd-exposure` — read-only inputs handed in by the upstream collaborators.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`receiver`]  | `ReceiverPoint`, `ReceiverSet` (combined + isolated levels) |
//! | [`traffic`]   | `LinkEntries`, `LinkTraffic` (link entries per interval)  |
//! | [`activity`]  | `ActivityExposure`, `OccupancyKey`, `Occupancy`           |
//! | [`loader`]    | `load_*_csv` / `load_*_reader` pairs                      |
//! | [`error`]     | `ExposureError`, `ExposureResult<T>`                      |
//!
//! Nothing here computes acoustics.  The crate stores what the upstream
//! trackers produced, keyed by flat composite keys.

pub mod activity;
pub mod error;
pub mod loader;
pub mod receiver;
pub mod traffic;


pub use activity::{ActivityExposure, Occupancy, OccupancyKey};
pub use error::{ExposureError, ExposureResult};
pub use loader::{
    load_activities_csv, load_activities_reader, load_receivers_csv, load_receivers_reader,
    load_traffic_csv, load_traffic_reader,
};
pub use receiver::{ReceiverPoint, ReceiverSet};
pub use traffic::{LinkEntries, LinkTraffic};
