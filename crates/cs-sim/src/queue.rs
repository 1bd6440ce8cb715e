//! `EventQueue` — virtual-time ordered event queue.
//!
//! Events are keyed by their due time in a `BTreeMap<SimTime, VecDeque<_>>`.
//! Events sharing a timestamp run in insertion order, which together with the
//! single `SimRng` makes a run fully reproducible from its seed.
//!
//! Nothing is ever cancelled: movement events carry the generation of the
//! cyclist record they were scheduled for, and the scheduler drops them on
//! pop if the record has been recycled since.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use cs_core::{CyclistId, NodeId, SimTime};

/// What happens when an event fires.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// A cyclist appears at `origin`.
    Arrival { origin: NodeId },
    /// Advance one interpolation step of `cyclist`, if still on `generation`.
    MoveStep { cyclist: CyclistId, generation: u32 },
    /// The nominal horizon.
    Horizon,
    /// Periodic idle-record reclamation.
    IdleSweep,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Arrival { .. }  => "arrival",
            EventKind::MoveStep { .. } => "move",
            EventKind::Horizon         => "horizon",
            EventKind::IdleSweep       => "idle-sweep",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Arrival { origin } => write!(f, "arrival@{origin}"),
            EventKind::MoveStep { cyclist, generation } => write!(f, "move {cyclist}#{generation}"),
            other => f.write_str(other.label()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub time: SimTime,
    pub kind: EventKind,
}

#[derive(Default)]
pub struct EventQueue {
    inner: BTreeMap<SimTime, VecDeque<EventKind>>,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` at `time`, behind anything already due then.
    pub fn push(&mut self, time: SimTime, kind: EventKind) {
        self.inner.entry(time).or_default().push_back(kind);
        self.total += 1;
    }

    /// Remove the earliest event.
    pub fn pop(&mut self) -> Option<Event> {
        let mut entry = self.inner.first_entry()?;
        let time = *entry.key();
        let kind = entry.get_mut().pop_front()?;
        if entry.get().is_empty() {
            entry.remove();
        }
        self.total -= 1;
        Some(Event { time, kind })
    }

    /// Due time of the earliest event.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.total = 0;
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct future timestamps.
    pub fn time_count(&self) -> usize {
        self.inner.len()
    }
}
