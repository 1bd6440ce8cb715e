//! `cs-sim` — discrete-event scheduler for the cyclesim traffic simulator.
//!
//! # Event loop
//!
//! ```text
//! initialize():
//!   rewind context, pre-warm pool
//!   queue Arrival(origin) at delay, Horizon at horizon_secs, IdleSweep
//!
//! step():                       (one event per call)
//!   pop earliest event, now ← event.time
//!   Arrival   → profile, destination, resolve route
//!                 ok      → acquire cyclist, queue MoveStep(now), next Arrival
//!                 no path → queue Arrival at now + retry delay
//!   MoveStep  → stale generation? drop
//!                 Waiting → plan hop 0
//!                 Moving  → advance one step; next hop or Completed → release
//!   Horizon   → Running → Completed (generation continues)
//!   IdleSweep → reclaim idle records, re-arm while anything is pending
//! ```
//!
//! Ties in virtual time run in insertion order, and every random draw comes
//! from one seeded `SimRng` in event order, so a seed fully determines the
//! event trace.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cs_arrival::ArrivalDistribution;
//! use cs_core::SimConfig;
//! use cs_sim::SimBuilder;
//!
//! let mut sim = SimBuilder::new(SimConfig::default())
//!     .network(network)
//!     .profiles(profiles)
//!     .arrival(origin, ArrivalDistribution::exponential(0.5))
//!     .build()?;
//! sim.initialize()?;
//! sim.run_to_horizon();
//! println!("{:?}", sim.statistics());
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod observer;
pub mod queue;
pub mod sim;
pub mod state;
pub mod stats;


pub use builder::SimBuilder;
pub use context::SimulationContext;
pub use error::{SimError, SimResult};
pub use observer::{EventTrace, NoopObserver, SimObserver};
pub use queue::{Event, EventKind, EventQueue};
pub use sim::Simulation;
pub use state::RunState;
pub use stats::{profile_color, CyclistView, SimStatistics, PROFILE_PALETTE};
