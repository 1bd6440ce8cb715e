//! `cs-core` — foundational types for the `cyclesim` traffic simulator.
//!
//! This crate is a dependency of every other `cs-*` crate.  It has no
//! `cs-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`ids`]       | `NodeId`, `EdgeId`, `CyclistId`, `ProfileId`          |
//! | [`geo`]       | `GeoPoint` (haversine), `Point2`                      |
//! | [`time`]      | `SimTime` (virtual seconds, totally ordered)          |
//! | [`config`]    | `SimConfig` + validation                              |
//! | [`rng`]       | `SimRng`                                              |
//! | [`error`]     | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, Point2};
pub use ids::{CyclistId, EdgeId, NodeId, ProfileId};
pub use rng::SimRng;
pub use time::SimTime;
