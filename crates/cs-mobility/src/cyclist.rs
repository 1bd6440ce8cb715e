//! The cyclist record.

use std::sync::Arc;

use cs_core::{CyclistId, NodeId, Point2, ProfileId, SimTime};

use crate::state::CyclistState;
use crate::trajectory::Trajectory;

/// One pooled cyclist.  Records are reused: `generation` increases every
/// time the record is handed out or taken back, so events scheduled for a
/// previous occupant can be recognised and dropped.
#[derive(Clone, Debug)]
pub struct Cyclist {
    pub id:         CyclistId,
    pub generation: u32,
    pub profile:    ProfileId,

    /// Node path, origin first.
    pub route: Arc<[NodeId]>,

    /// Sampled once at spawn.
    pub base_velocity_mps: f64,
    /// Slope-adjusted velocity on the current hop.
    pub velocity_mps: f64,

    pub position: Point2,
    pub state:    CyclistState,

    pub trajectory: Trajectory,

    pub spawned_at:  SimTime,
    pub last_active: SimTime,

    /// Metres covered by completed hops.
    pub distance_m: f64,

    /// `true` if the route came from the fewest-hop fallback.
    pub fallback_route: bool,
}

impl Cyclist {
    pub(crate) fn blank(id: CyclistId, trajectory_capacity: usize, stride: u32) -> Self {
        Self {
            id,
            generation:        0,
            profile:           ProfileId::INVALID,
            route:             Arc::from(Vec::new()),
            base_velocity_mps: 0.0,
            velocity_mps:      0.0,
            position:          Point2::ORIGIN,
            state:             CyclistState::Reclaimed,
            trajectory:        Trajectory::new(trajectory_capacity, stride),
            spawned_at:        SimTime::ZERO,
            last_active:       SimTime::ZERO,
            distance_m:        0.0,
            fallback_route:    false,
        }
    }

    /// Prepare a freshly acquired record for a new trip.
    pub fn begin_trip(
        &mut self,
        profile:        ProfileId,
        route:          Arc<[NodeId]>,
        base_velocity:  f64,
        start_position: Point2,
        now:            SimTime,
    ) {
        self.profile = profile;
        self.route = route;
        self.base_velocity_mps = base_velocity;
        self.velocity_mps = base_velocity;
        self.position = start_position;
        self.state = CyclistState::Waiting { until: now };
        self.trajectory.clear();
        self.trajectory.push(now, start_position);
        self.spawned_at = now;
        self.last_active = now;
        self.distance_m = 0.0;
        self.fallback_route = false;
    }

    pub fn origin(&self) -> Option<NodeId> {
        self.route.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.route.last().copied()
    }

    pub fn hop_count(&self) -> usize {
        self.route.len().saturating_sub(1)
    }

    /// Endpoints of hop `index`.
    pub fn hop(&self, index: usize) -> Option<(NodeId, NodeId)> {
        Some((*self.route.get(index)?, *self.route.get(index + 1)?))
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Seconds since spawn.
    pub fn trip_secs(&self, now: SimTime) -> f64 {
        now.since(self.spawned_at)
    }
}
