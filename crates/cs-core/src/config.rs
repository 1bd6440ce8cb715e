//! Top-level simulation configuration.

use crate::{CoreError, CoreResult};

/// Tunables for one simulation run.
///
/// Typically built in code or loaded from a JSON file by the application
/// crate (with the `serde` feature) and handed to `SimBuilder`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Nominal run length in virtual seconds.  The horizon event marks the
    /// run `Completed` here but does not stop the event queue.
    pub horizon_secs: f64,

    /// Master RNG seed.  The same seed always produces an identical event
    /// trace.
    pub seed: u64,

    /// Rider velocity band in metres per second.  Base velocities are drawn
    /// from it and slope-adjusted velocities are clamped back into it.
    pub velocity_min_mps: f64,
    pub velocity_max_mps: f64,

    /// Upper bound on interpolation steps for a single edge, whatever its
    /// length.
    pub max_steps_per_edge: u32,

    /// Keep one trajectory point every `trajectory_stride` steps.
    pub trajectory_stride: u32,

    /// Ring-buffer capacity of each cyclist's trajectory.
    pub trajectory_capacity: usize,

    /// Records created up front on `initialize()`.
    pub pool_prewarm: usize,

    /// Hard cap on simultaneously active cyclists.  At the cap the oldest
    /// active cyclist is recycled.
    pub max_active_cyclists: usize,

    /// Inactivity after which the idle sweep reclaims a record.
    pub idle_timeout_secs: f64,

    /// Period of the idle sweep event.
    pub idle_sweep_interval_secs: f64,

    /// Delay before generation retries after a spawn found no path.
    pub no_path_retry_secs: f64,

    /// When set, no arrivals are generated at or after the horizon.  Off by
    /// default: stepping past the horizon keeps generating.
    pub stop_generation_at_horizon: bool,

    /// Reject graphs that are not a single connected component.
    pub require_connected_graph: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            horizon_secs:               3_600.0,
            seed:                       42,
            velocity_min_mps:           3.0,
            velocity_max_mps:           8.0,
            max_steps_per_edge:         200,
            trajectory_stride:          5,
            trajectory_capacity:        100,
            pool_prewarm:               50,
            max_active_cyclists:        500,
            idle_timeout_secs:          300.0,
            idle_sweep_interval_secs:   60.0,
            no_path_retry_secs:         1.0,
            stop_generation_at_horizon: false,
            require_connected_graph:    true,
        }
    }
}

impl SimConfig {
    /// Check every field for values that would produce a broken run.
    pub fn validate(&self) -> CoreResult<()> {
        fn positive(name: &str, v: f64) -> CoreResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(CoreError::Config(format!("{name} must be a positive finite number, got {v}")))
            }
        }

        positive("horizon_secs", self.horizon_secs)?;
        positive("velocity_min_mps", self.velocity_min_mps)?;
        positive("velocity_max_mps", self.velocity_max_mps)?;
        if self.velocity_min_mps > self.velocity_max_mps {
            return Err(CoreError::Config(format!(
                "velocity band is empty: min {} > max {}",
                self.velocity_min_mps, self.velocity_max_mps
            )));
        }
        if self.max_steps_per_edge == 0 {
            return Err(CoreError::Config("max_steps_per_edge must be at least 1".into()));
        }
        if self.trajectory_stride == 0 {
            return Err(CoreError::Config("trajectory_stride must be at least 1".into()));
        }
        if self.trajectory_capacity == 0 {
            return Err(CoreError::Config("trajectory_capacity must be at least 1".into()));
        }
        if self.max_active_cyclists == 0 {
            return Err(CoreError::Config("max_active_cyclists must be at least 1".into()));
        }
        positive("idle_timeout_secs", self.idle_timeout_secs)?;
        positive("idle_sweep_interval_secs", self.idle_sweep_interval_secs)?;
        if !self.no_path_retry_secs.is_finite() || self.no_path_retry_secs < 0.0 {
            return Err(CoreError::Config(format!(
                "no_path_retry_secs must be >= 0, got {}",
                self.no_path_retry_secs
            )));
        }
        Ok(())
    }
}
