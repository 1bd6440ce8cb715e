//! Simulation observer trait for progress reporting and data collection.

use cs_core::{NodeId, SimTime};
use cs_mobility::Cyclist;

use crate::queue::Event;
use crate::RunState;

/// Callbacks invoked by [`Simulation::step_with`][crate::Simulation::step_with]
/// while it processes an event.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: trip logger
///
/// ```rust,ignore
/// struct TripLog(Vec<(f64, f64)>);
///
/// impl SimObserver for TripLog {
///     fn on_complete(&mut self, now: SimTime, cyclist: &Cyclist) {
///         self.0.push((now.as_secs(), cyclist.distance_m));
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called for every popped event, stale movement events included, before
    /// it is handled.
    fn on_event(&mut self, _event: &Event) {}

    /// Called once a cyclist has its route and is waiting for its first step.
    fn on_spawn(&mut self, _now: SimTime, _cyclist: &Cyclist) {}

    /// Called when a cyclist reaches its destination, just before its record
    /// goes back to the pool.
    fn on_complete(&mut self, _now: SimTime, _cyclist: &Cyclist) {}

    /// Called when an arrival found no route and was abandoned.
    fn on_no_path(&mut self, _now: SimTime, _origin: NodeId, _destination: NodeId) {}

    /// Called when an event changes the run state (the horizon).
    fn on_state_change(&mut self, _now: SimTime, _from: RunState, _to: RunState) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Records every processed event.  Two runs with the same seed and scenario
/// produce equal traces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventTrace {
    pub events:    Vec<Event>,
    pub spawns:    usize,
    pub completes: usize,
    pub no_paths:  usize,
}

impl EventTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(time, event type)` pairs in processing order.
    pub fn pairs(&self) -> Vec<(SimTime, &'static str)> {
        self.events.iter().map(|e| (e.time, e.kind.label())).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl SimObserver for EventTrace {
    fn on_event(&mut self, event: &Event) {
        self.events.push(*event);
    }

    fn on_spawn(&mut self, _now: SimTime, _cyclist: &Cyclist) {
        self.spawns += 1;
    }

    fn on_complete(&mut self, _now: SimTime, _cyclist: &Cyclist) {
        self.completes += 1;
    }

    fn on_no_path(&mut self, _now: SimTime, _origin: NodeId, _destination: NodeId) {
        self.no_paths += 1;
    }
}
