//! Read-only snapshots handed to the outside: per-cyclist views and
//! aggregate counters.

use cs_core::{CyclistId, Point2, ProfileId};
use cs_mobility::{Cyclist, CyclistState};

/// Display colours, indexed by profile id modulo the palette length.
pub const PROFILE_PALETTE: [[u8; 3]; 8] = [
    [0x1f, 0x77, 0xb4],
    [0xff, 0x7f, 0x0e],
    [0x2c, 0xa0, 0x2c],
    [0xd6, 0x27, 0x28],
    [0x94, 0x67, 0xbd],
    [0x8c, 0x56, 0x4b],
    [0xe3, 0x77, 0xc2],
    [0x17, 0xbe, 0xcf],
];

pub fn profile_color(profile: ProfileId) -> [u8; 3] {
    PROFILE_PALETTE[profile.index() % PROFILE_PALETTE.len()]
}

/// One active cyclist as seen by a renderer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CyclistView {
    pub id:           CyclistId,
    pub profile:      ProfileId,
    pub position:     Point2,
    pub color:        [u8; 3],
    pub velocity_mps: f64,
    pub state:        CyclistState,
}

impl CyclistView {
    pub fn of(cyclist: &Cyclist) -> Self {
        Self {
            id:           cyclist.id,
            profile:      cyclist.profile,
            position:     cyclist.position,
            color:        profile_color(cyclist.profile),
            velocity_mps: cyclist.velocity_mps,
            state:        cyclist.state,
        }
    }
}

/// Counters kept by the scheduler itself.  Pool, cache and per-profile
/// counters live in their owners and are merged into [`SimStatistics`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct RunCounters {
    pub spawned:           u64,
    pub completed:         u64,
    pub no_path:           u64,
    pub fallback_routes:   u64,
    pub events_processed:  u64,
    pub stale_events:      u64,
    pub total_distance_m:  f64,
    pub total_travel_secs: f64,
}

/// Aggregate counters since the last `initialize()` or `reset()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimStatistics {
    pub now_secs: f64,

    pub spawned:   u64,
    pub completed: u64,
    pub active:    usize,

    /// Arrivals abandoned because no route existed.
    pub no_path:         u64,
    /// Spawns that rode the fewest-hop fallback route.
    pub fallback_routes: u64,
    pub forced_recycles: u64,
    pub idle_reclaimed:  u64,

    pub events_processed: u64,
    /// Movement events dropped because their cyclist was recycled.
    pub stale_events:     u64,

    pub cache_hits:      u64,
    pub cache_misses:    u64,
    pub cache_evictions: u64,
    pub cache_entries:   usize,

    /// Spawns per profile, indexed by `ProfileId`.
    pub spawns_per_profile: Vec<u64>,

    /// Metres ridden by completed trips.
    pub total_distance_m:  f64,
    /// Virtual seconds spent by completed trips.
    pub total_travel_secs: f64,
}

impl SimStatistics {
    /// Mean duration of a completed trip, `0` before the first completion.
    pub fn mean_trip_secs(&self) -> f64 {
        if self.completed == 0 {
            0.0
        } else {
            self.total_travel_secs / self.completed as f64
        }
    }

    /// Observed share of spawns per profile.
    pub fn profile_shares(&self) -> Vec<f64> {
        let total: u64 = self.spawns_per_profile.iter().sum();
        if total == 0 {
            return vec![0.0; self.spawns_per_profile.len()];
        }
        self.spawns_per_profile
            .iter()
            .map(|&n| n as f64 / total as f64)
            .collect()
    }
}
