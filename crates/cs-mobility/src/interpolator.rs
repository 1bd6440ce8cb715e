//! Hop-level movement model.
//!
//! # Speed
//!
//! Slope scales the rider's base velocity:
//!
//! | Grade          | Factor                          |
//! |----------------|---------------------------------|
//! | uphill `+s %`  | `1 - min(0.05·s, 0.5)`          |
//! | downhill `-s %`| `1 + min(0.03·s, 0.3)`          |
//!
//! and the result is clamped into the configured velocity band.
//!
//! # Time factor
//!
//! Safety and luminosity do not change speed; they stretch the time a hop
//! takes: `1 + 0.05·(5 - safety) + 0.05·(5 - luminosity)`, clamped to
//! `[0.5, 2.0]`.  A dark, unsafe street makes riders hesitate.
//!
//! # Discretization
//!
//! A hop is split into `ceil(travel_secs)` steps (one per simulated second),
//! at least 1 and at most `max_steps_per_edge`.

use cs_core::{NodeId, Point2, SimConfig, SimTime};
use cs_spatial::{EdgeAttributes, RoadNetwork};

use crate::{MobilityError, MobilityResult};

const UPHILL_PENALTY_PER_PCT: f64 = 0.05;
const UPHILL_MAX_PENALTY: f64 = 0.5;
const DOWNHILL_BONUS_PER_PCT: f64 = 0.03;
const DOWNHILL_MAX_BONUS: f64 = 0.3;

/// Scale values at which the time factor is neutral.
const NEUTRAL_SCALE: f64 = 5.0;
const HESITATION_PER_POINT: f64 = 0.05;
const TIME_FACTOR_MIN: f64 = 0.5;
const TIME_FACTOR_MAX: f64 = 2.0;

/// Timing of one hop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HopPlan {
    pub from:         Point2,
    pub to:           Point2,
    pub distance_m:   f64,
    pub velocity_mps: f64,
    pub time_factor:  f64,
    pub travel_secs:  f64,
    pub steps:        u32,
}

impl HopPlan {
    /// Virtual seconds between consecutive steps.
    pub fn step_secs(&self) -> f64 {
        self.travel_secs / self.steps as f64
    }

    /// Interpolated position after `step` of `steps`.
    pub fn position_at(&self, step: u32) -> Point2 {
        let t = (step.min(self.steps)) as f64 / self.steps as f64;
        self.from.lerp(self.to, t)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MovementInterpolator {
    velocity_min: f64,
    velocity_max: f64,
    max_steps:    u32,
}

impl MovementInterpolator {
    /// A band with `min > max` is collapsed onto `min`.
    pub fn new(velocity_min: f64, velocity_max: f64, max_steps: u32) -> Self {
        Self {
            velocity_min,
            velocity_max: velocity_max.max(velocity_min),
            max_steps:    max_steps.max(1),
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.velocity_min_mps, config.velocity_max_mps, config.max_steps_per_edge)
    }

    pub fn velocity_band(&self) -> (f64, f64) {
        (self.velocity_min, self.velocity_max)
    }

    /// Slope-adjusted velocity, always inside the velocity band.
    pub fn adjusted_velocity(&self, base_velocity: f64, slope_pct: f64) -> f64 {
        let slope = if slope_pct.is_finite() { slope_pct } else { 0.0 };
        let factor = if slope > 0.0 {
            1.0 - (UPHILL_PENALTY_PER_PCT * slope).min(UPHILL_MAX_PENALTY)
        } else {
            1.0 + (DOWNHILL_BONUS_PER_PCT * -slope).min(DOWNHILL_MAX_BONUS)
        };
        let v = base_velocity * factor;
        if v.is_finite() {
            v.clamp(self.velocity_min, self.velocity_max)
        } else {
            self.velocity_min
        }
    }

    /// Duration multiplier from safety and luminosity, in `[0.5, 2.0]`.
    pub fn time_factor(&self, safety: f64, luminosity: f64) -> f64 {
        let f = 1.0
            + HESITATION_PER_POINT * (NEUTRAL_SCALE - safety)
            + HESITATION_PER_POINT * (NEUTRAL_SCALE - luminosity);
        if f.is_finite() { f.clamp(TIME_FACTOR_MIN, TIME_FACTOR_MAX) } else { 1.0 }
    }

    /// Plan a hop over a road with `attrs` between two positions.
    pub fn plan(&self, attrs: &EdgeAttributes, from: Point2, to: Point2, base_velocity: f64) -> HopPlan {
        let velocity_mps = self.adjusted_velocity(base_velocity, attrs.slope_pct);
        let time_factor = self.time_factor(attrs.safety, attrs.luminosity);
        let distance_m = attrs.distance_m.max(0.0);
        let travel_secs = distance_m / velocity_mps * time_factor;

        let steps = if travel_secs.is_finite() && travel_secs > 0.0 {
            (travel_secs.ceil() as u64).clamp(1, self.max_steps as u64) as u32
        } else {
            1
        };
        HopPlan {
            from,
            to,
            distance_m,
            velocity_mps,
            time_factor,
            travel_secs: if travel_secs.is_finite() { travel_secs } else { 0.0 },
            steps,
        }
    }

    /// Plan the hop `current → next` on `network`.
    pub fn plan_hop(
        &self,
        network:       &RoadNetwork,
        current:       NodeId,
        next:          NodeId,
        base_velocity: f64,
    ) -> MobilityResult<HopPlan> {
        let edge = network
            .edge_between(current, next)
            .ok_or(MobilityError::NoEdge { from: current, to: next })?;
        Ok(self.plan(network.attrs(edge), network.position(current), network.position(next), base_velocity))
    }

    /// Every `(time, position)` sample of the hop `current → next` starting
    /// at `start`, one per step, ending at `next`'s position.
    pub fn advance(
        &self,
        network:       &RoadNetwork,
        current:       NodeId,
        next:          NodeId,
        base_velocity: f64,
        start:         SimTime,
    ) -> MobilityResult<Vec<(SimTime, Point2)>> {
        let plan = self.plan_hop(network, current, next, base_velocity)?;
        let dt = plan.step_secs();
        Ok((1..=plan.steps)
            .map(|s| (start.after(dt * s as f64), plan.position_at(s)))
            .collect())
    }
}
