//! Run configuration.

use crate::error::{CoreError, CoreResult};
use crate::time::IntervalGrid;

/// Top-level configuration for one damage-cost run.
///
/// Typically loaded from a TOML file by the application crate (with the
/// `serde` feature every field is optional and falls back to
/// [`NoiseConfig::default`]).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NoiseConfig {
    /// Width of one time interval in seconds.  Default: 3600.
    pub interval_width_secs: u32,

    /// Last interval end covered by the run.  Must be a multiple of the
    /// width.  Default: 30 h, so overnight spill-over is kept.
    pub horizon_secs: u32,

    /// Societal damage cost per annoyed-population equivalent and year.
    pub annual_cost_rate: f64,

    /// Vehicle ids starting with this prefix are heavy goods vehicles.
    pub hgv_id_prefix: String,

    /// Population sample scale; caused costs are divided by it.
    pub scale_factor: f64,

    /// Retain emitted events in the report.  Sinks receive them either way.
    pub collect_events: bool,
}

impl NoiseConfig {
    /// Default cost rate: 85 DM per year (1995), converted to EUR and
    /// inflated at 2 % p.a. to 2014 prices.
    pub fn default_annual_cost_rate() -> f64 {
        (85.0 / 1.95583) * 1.02_f64.powi(2014 - 1995)
    }

    /// The interval grid this configuration describes.
    pub fn grid(&self) -> CoreResult<IntervalGrid> {
        IntervalGrid::new(self.interval_width_secs, self.horizon_secs)
    }

    /// Fraction of one day represented by a single interval.
    #[inline]
    pub fn day_fraction(&self) -> f64 {
        f64::from(self.interval_width_secs) / 86_400.0
    }

    /// Reject configurations that would make every later stage meaningless.
    pub fn validate(&self) -> CoreResult<()> {
        if self.interval_width_secs == 0 {
            return Err(CoreError::config(
                "interval_width_secs",
                self.interval_width_secs,
                "must be positive",
            ));
        }
        if self.horizon_secs < self.interval_width_secs {
            return Err(CoreError::config(
                "horizon_secs",
                self.horizon_secs,
                "must cover at least one interval",
            ));
        }
        if self.horizon_secs % self.interval_width_secs != 0 {
            return Err(CoreError::config(
                "horizon_secs",
                self.horizon_secs,
                "must be a multiple of interval_width_secs",
            ));
        }
        if !self.annual_cost_rate.is_finite() || self.annual_cost_rate < 0.0 {
            return Err(CoreError::config(
                "annual_cost_rate",
                self.annual_cost_rate,
                "must be finite and non-negative",
            ));
        }
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(CoreError::config(
                "scale_factor",
                self.scale_factor,
                "must be finite and positive",
            ));
        }
        if self.hgv_id_prefix.is_empty() {
            return Err(CoreError::config(
                "hgv_id_prefix",
                "\"\"",
                "must not be empty (every vehicle would be heavy)",
            ));
        }
        Ok(())
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            interval_width_secs: 3_600,
            horizon_secs:        30 * 3_600,
            annual_cost_rate:    Self::default_annual_cost_rate(),
            hgv_id_prefix:       "lkw".to_owned(),
            scale_factor:        1.0,
            collect_events:      true,
        }
    }
}
