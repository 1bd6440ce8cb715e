//! Per-cyclist lifecycle state.

use std::fmt;

use cs_core::SimTime;

/// Where a cyclist is in its trip.
///
/// ```text
/// Waiting ──first step──▶ Moving ──last hop done──▶ Completed ──release──▶ Reclaimed
///    └──────────────── forced recycle / idle sweep ─────────────────────────▲
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CyclistState {
    /// Spawned, first movement event due at `until`.
    Waiting { until: SimTime },
    /// Traversing hop `edge_index` of the route; `step` of `steps` done.
    Moving { edge_index: usize, step: u32, steps: u32 },
    /// Reached the destination.
    Completed,
    /// Back in the pool's free list.
    Reclaimed,
}

impl CyclistState {
    /// `true` for states that still have pending movement.
    pub fn is_active(&self) -> bool {
        matches!(self, CyclistState::Waiting { .. } | CyclistState::Moving { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            CyclistState::Waiting { .. } => "waiting",
            CyclistState::Moving { .. }  => "moving",
            CyclistState::Completed      => "completed",
            CyclistState::Reclaimed      => "reclaimed",
        }
    }

    /// Fraction of the current hop done, `0` outside `Moving`.
    pub fn hop_progress(&self) -> f64 {
        match *self {
            CyclistState::Moving { step, steps, .. } if steps > 0 => step as f64 / steps as f64,
            _ => 0.0,
        }
    }
}

impl fmt::Display for CyclistState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
