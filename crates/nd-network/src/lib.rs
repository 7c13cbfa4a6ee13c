//! `nd-network` — the link set that bounds every per-link table.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `LinkNetwork` (SoA link attributes), `LinkNetworkBuilder`   |
//! | [`loader`]  | `load_links_csv`, `load_links_reader`                       |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                          |

pub mod error;
pub mod loader;
pub mod network;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use loader::{load_links_csv, load_links_reader};
pub use network::{LinkNetwork, LinkNetworkBuilder};
