//! Acoustic and monetary equations used by every pipeline stage.
//!
//! All levels are in dB(A).  Energy-domain ratios convert both operands
//! with `10^(0.1·L)` before dividing, which is how a logarithmic level sum
//! is decomposed back into per-source fractions.

use nd_core::{DayPeriod, VehicleCategory};

/// Days per year used to pro-rate the annual cost rate.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Perceived-annoyance multiplier for `level_db` in the given period.
///
/// Zero below the period's threshold, `2^(0.1·(L − threshold))` at or
/// above it.
#[inline]
pub fn loudness_weight(level_db: f64, period: DayPeriod) -> f64 {
    let threshold = period.threshold_db();
    if level_db < threshold {
        0.0
    } else {
        2f64.powf(0.1 * (level_db - threshold))
    }
}

/// Monetary cost of `equivalent` annoyed-population units over a fraction
/// `day_fraction` of one day.
#[inline]
pub fn damage_cost(annual_cost_rate: f64, equivalent: f64, day_fraction: f64) -> f64 {
    annual_cost_rate * equivalent / DAYS_PER_YEAR * day_fraction
}

/// Fraction of the resulting immission energy carried by one isolated
/// contribution.
#[inline]
pub fn immission_share(isolated_db: f64, resulting_db: f64) -> f64 {
    10f64.powf(0.1 * isolated_db) / 10f64.powf(0.1 * resulting_db)
}

/// RLS-90 reference emission level of a passenger car at `speed_kmh`.
#[inline]
pub fn emission_level_car(speed_kmh: f64) -> f64 {
    27.7 + 10.0 * (1.0 + (0.02 * speed_kmh).powi(3)).log10()
}

/// RLS-90 reference emission level of a heavy goods vehicle at `speed_kmh`.
#[inline]
pub fn emission_level_hgv(speed_kmh: f64) -> f64 {
    23.1 + 12.5 * speed_kmh.log10()
}

/// Emission level for `category` at `speed_kmh`.
pub fn emission_level(category: VehicleCategory, speed_kmh: f64) -> f64 {
    match category {
        VehicleCategory::Car => emission_level_car(speed_kmh),
        VehicleCategory::Hgv => emission_level_hgv(speed_kmh),
    }
}

/// Energy share of one vehicle category on a link.
///
/// ```text
///            n₁·10^(0.1·L₁)
/// share = ─────────────────────────────
///          n₁·10^(0.1·L₁) + n₂·10^(0.1·L₂)
/// ```
///
/// Returns 0 when `count` is 0, whatever the other category carries.
pub fn category_share(count: u32, level_db: f64, other_count: u32, other_level_db: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let own = f64::from(count) * 10f64.powf(0.1 * level_db);
    let other = f64::from(other_count) * 10f64.powf(0.1 * other_level_db);
    own / (own + other)
}
