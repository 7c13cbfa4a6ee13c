//! Discretised time model.
//!
//! # Design
//!
//! All noise and cost computations are bucketed into fixed-width intervals.
//! An interval is identified by its **end** timestamp in seconds since
//! midnight of the simulated day:
//!
//! ```text
//! width = 3600:   TimeInterval(3600)  covers (0 s, 3600 s]
//!                 TimeInterval(7200)  covers (3600 s, 7200 s]
//! ```
//!
//! The set of valid intervals is an [`IntervalGrid`]: every multiple of the
//! width from one width up to the horizon.  The default horizon is 30 h so
//! trips and activities that spill over midnight are still accounted for.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Seconds in one day; period classification wraps at this boundary.
pub const SECS_PER_DAY: u32 = 86_400;

// ── TimeInterval ──────────────────────────────────────────────────────────────

/// A time bucket identified by its end timestamp in seconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeInterval(pub u32);

impl TimeInterval {
    #[inline]
    pub fn end_secs(self) -> u32 {
        self.0
    }

    /// Start of the bucket for a grid of the given width.
    #[inline]
    pub fn start_secs(self, width_secs: u32) -> u32 {
        self.0.saturating_sub(width_secs)
    }

    /// Position of the interval on a 24 h clock, independent of day.
    #[inline]
    pub fn clock_secs(self) -> u32 {
        self.0 % SECS_PER_DAY
    }

    /// Day / evening / night band for this interval.
    #[inline]
    pub fn period(self) -> DayPeriod {
        DayPeriod::classify(self)
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0 / 3_600;
        let m = (self.0 % 3_600) / 60;
        let s = self.0 % 60;
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

// ── DayPeriod ─────────────────────────────────────────────────────────────────

/// Time-of-day band that selects the audibility threshold.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayPeriod {
    /// `(06:00, 18:00]`
    Day,
    /// `(18:00, 22:00]`
    Evening,
    /// Everything else, including exactly 06:00.
    Night,
}

impl DayPeriod {
    const DAY_START:     u32 = 6 * 3_600;
    const EVENING_START: u32 = 18 * 3_600;
    const NIGHT_START:   u32 = 22 * 3_600;

    /// Classify an interval by its end timestamp on a 24 h clock.
    pub fn classify(interval: TimeInterval) -> DayPeriod {
        let t = interval.clock_secs();
        if t > Self::DAY_START && t <= Self::EVENING_START {
            DayPeriod::Day
        } else if t > Self::EVENING_START && t <= Self::NIGHT_START {
            DayPeriod::Evening
        } else {
            DayPeriod::Night
        }
    }

    /// Level (dB(A)) below which a receiver is not considered annoyed.
    pub fn threshold_db(self) -> f64 {
        match self {
            DayPeriod::Day     => 50.0,
            DayPeriod::Evening => 45.0,
            DayPeriod::Night   => 40.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayPeriod::Day     => "day",
            DayPeriod::Evening => "evening",
            DayPeriod::Night   => "night",
        }
    }
}

impl fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── IntervalGrid ──────────────────────────────────────────────────────────────

/// The ordered set of intervals a run covers.
///
/// Cheap to copy; holds no heap data.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct IntervalGrid {
    width_secs:   u32,
    horizon_secs: u32,
}

impl IntervalGrid {
    /// A zero width is rejected; a horizon that is not a multiple of the
    /// width ends at the last whole interval.
    pub fn new(width_secs: u32, horizon_secs: u32) -> CoreResult<Self> {
        if width_secs == 0 {
            return Err(CoreError::config("interval_width_secs", width_secs, "must be positive"));
        }
        Ok(Self { width_secs, horizon_secs })
    }

    #[inline]
    pub fn width_secs(&self) -> u32 {
        self.width_secs
    }

    #[inline]
    pub fn horizon_secs(&self) -> u32 {
        self.horizon_secs
    }

    /// Number of intervals in the grid.
    pub fn len(&self) -> usize {
        (self.horizon_secs / self.width_secs) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if `interval` is one of the grid's bucket keys.
    pub fn contains(&self, interval: TimeInterval) -> bool {
        interval.0 >= self.width_secs
            && interval.0 <= self.horizon_secs
            && interval.0 % self.width_secs == 0
    }

    /// Iterate `width, 2·width, …` up to and including the horizon.
    pub fn iter(&self) -> impl Iterator<Item = TimeInterval> + '_ {
        let width = self.width_secs;
        (1..=self.len() as u32).map(move |n| TimeInterval(n * width))
    }
}
