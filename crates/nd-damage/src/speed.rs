//! Per-category speed strategies for emission levels.

use nd_core::VehicleCategory;

/// Decides the speed each vehicle category is assumed to drive on a link.
///
/// The splitter calls this once per category per link interval with the
/// link's free-flow speed and feeds the result into the emission curves.
///
/// # Example: urban speed limit for everyone
///
/// ```rust
/// use nd_core::VehicleCategory;
/// use nd_damage::SpeedModel;
///
/// struct Limit30;
///
/// impl SpeedModel for Limit30 {
///     fn speed_kmh(&self, _category: VehicleCategory, freespeed_kmh: f64) -> f64 {
///         freespeed_kmh.min(30.0)
///     }
/// }
///
/// assert_eq!(Limit30.speed_kmh(VehicleCategory::Car, 50.0), 30.0);
/// ```
pub trait SpeedModel: Send + Sync {
    fn speed_kmh(&self, category: VehicleCategory, freespeed_kmh: f64) -> f64;
}

/// Both categories drive at the link's free-flow speed.
#[derive(Copy, Clone, Debug, Default)]
pub struct FreeFlowSpeed;

impl SpeedModel for FreeFlowSpeed {
    #[inline]
    fn speed_kmh(&self, _category: VehicleCategory, freespeed_kmh: f64) -> f64 {
        freespeed_kmh
    }
}

/// Heavy vehicles are capped at `max_kmh`; cars use free-flow speed.
#[derive(Copy, Clone, Debug)]
pub struct HgvSpeedCap {
    pub max_kmh: f64,
}

impl HgvSpeedCap {
    pub fn new(max_kmh: f64) -> Self {
        Self { max_kmh }
    }
}

impl SpeedModel for HgvSpeedCap {
    #[inline]
    fn speed_kmh(&self, category: VehicleCategory, freespeed_kmh: f64) -> f64 {
        match category {
            VehicleCategory::Car => freespeed_kmh,
            VehicleCategory::Hgv => freespeed_kmh.min(self.max_kmh),
        }
    }
}
