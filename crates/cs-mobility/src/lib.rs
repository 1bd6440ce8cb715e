//! `cs-mobility` — cyclist records, the movement model, and the pool.
//!
//! # Crate layout
//!
//! | Module           | Contents                                               |
//! |------------------|--------------------------------------------------------|
//! | [`state`]        | `CyclistState` lifecycle                               |
//! | [`trajectory`]   | `Trajectory` ring buffer, `TrajectoryPoint`            |
//! | [`cyclist`]      | `Cyclist` record                                       |
//! | [`interpolator`] | `MovementInterpolator`, `HopPlan`                      |
//! | [`pool`]         | `CyclistPool`, `Acquired`, `PoolStats`, `SweepReport`  |
//! | [`error`]        | `MobilityError`, `MobilityResult<T>`                   |
//!
//! # Movement model (discrete steps)
//!
//! A trip is a node route.  Each hop is planned once by the interpolator
//! (velocity, duration, step count) and then advanced one step per
//! scheduler event; the cyclist's position is the linear interpolation
//! between the hop's endpoints.  Trajectory points are kept at a fixed
//! stride in a bounded buffer.

pub mod cyclist;
pub mod error;
pub mod interpolator;
pub mod pool;
pub mod state;
pub mod trajectory;

#[cfg(test)]
mod tests;

pub use cyclist::Cyclist;
pub use error::{MobilityError, MobilityResult};
pub use interpolator::{HopPlan, MovementInterpolator};
pub use pool::{Acquired, CyclistPool, PoolStats, SweepReport};
pub use state::CyclistState;
pub use trajectory::{Trajectory, TrajectoryPoint};
