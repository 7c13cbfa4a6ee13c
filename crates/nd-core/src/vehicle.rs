//! Vehicle category enum shared by the traffic inputs and the cost splitter.

use crate::VehicleId;

/// Emission class of a vehicle.
///
/// The category decides which RLS-90 emission curve applies and which
/// per-vehicle cost pool a link entry draws from.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleCategory {
    /// Passenger cars and other light vehicles.
    Car,
    /// Heavy goods vehicles.
    Hgv,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 2] = [VehicleCategory::Car, VehicleCategory::Hgv];

    /// Classify by id prefix: ids starting with `hgv_prefix` are heavy.
    #[inline]
    pub fn of(vehicle: &VehicleId, hgv_prefix: &str) -> VehicleCategory {
        if vehicle.as_str().starts_with(hgv_prefix) {
            VehicleCategory::Hgv
        } else {
            VehicleCategory::Car
        }
    }

    /// Human-readable label, useful for CSV/Parquet column values.
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleCategory::Car => "car",
            VehicleCategory::Hgv => "hgv",
        }
    }
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
