//! Virtual simulation time.
//!
//! # Design
//!
//! Time is a monotonically non-decreasing count of simulated seconds held in
//! an `f64`.  It is advanced only by popping events; it has no relation to
//! wall-clock time.
//!
//! `SimTime` is totally ordered (via `f64::total_cmp`) so it can key a
//! `BTreeMap` event queue directly.  Constructors reject NaN and negative
//! values, so the total order agrees with the numeric one for every value
//! that can actually exist.

use std::cmp::Ordering;
use std::fmt;

/// An absolute point in virtual time, in seconds since simulation start.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    /// Build a time from seconds.  NaN and negative inputs collapse to zero;
    /// `+inf` is kept (useful as a "never" sentinel).
    #[inline]
    pub fn from_secs(secs: f64) -> SimTime {
        if secs.is_nan() || secs < 0.0 {
            SimTime(0.0)
        } else {
            SimTime(secs)
        }
    }

    #[inline]
    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// The time `delay` seconds after `self`.  Negative or NaN delays are
    /// treated as zero so time never runs backwards.
    #[inline]
    pub fn after(self, delay: f64) -> SimTime {
        if delay.is_nan() || delay <= 0.0 {
            self
        } else {
            SimTime(self.0 + delay)
        }
    }

    /// Seconds elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}s", self.0)
    }
}
