//! Bounded reuse pool for cyclist records.
//!
//! # Backpressure
//!
//! At most `max_active` records are active at once.  Acquiring at the cap
//! recycles the oldest active record in place (its previous occupant simply
//! disappears) instead of growing.  Recycling bumps the record's
//! generation, which turns every event still scheduled for the old
//! occupant into a no-op.
//!
//! # Idle sweep
//!
//! [`sweep_idle`](CyclistPool::sweep_idle) reclaims active records that have
//! not moved for longer than a timeout, then drops the trajectory memory of
//! free records beyond the pre-warm size.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use cs_core::{CyclistId, SimConfig, SimTime};

use crate::cyclist::Cyclist;
use crate::state::CyclistState;
use crate::{MobilityError, MobilityResult};

/// Counters since construction or the last [`reset_stats`](CyclistPool::reset_stats).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub created:         u64,
    pub acquired:        u64,
    pub released:        u64,
    pub forced_recycles: u64,
    pub idle_reclaimed:  u64,
    pub trimmed:         u64,
}

/// Result of [`CyclistPool::acquire`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Acquired {
    pub id:         CyclistId,
    pub generation: u32,
    /// `true` if an active cyclist was recycled to make room.
    pub recycled:   bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub reclaimed: Vec<CyclistId>,
    pub trimmed:   usize,
}

pub struct CyclistPool {
    records: Vec<Cyclist>,
    free:    Vec<CyclistId>,

    /// Active records keyed by acquisition sequence; the first entry is the
    /// oldest.
    active:     BTreeMap<u64, CyclistId>,
    active_seq: Vec<Option<u64>>,
    next_seq:   u64,

    prewarm:             usize,
    max_active:          usize,
    trajectory_capacity: usize,
    trajectory_stride:   u32,

    stats: PoolStats,
}

impl CyclistPool {
    pub fn new(prewarm: usize, max_active: usize, trajectory_capacity: usize, trajectory_stride: u32) -> Self {
        Self {
            records:    Vec::new(),
            free:       Vec::new(),
            active:     BTreeMap::new(),
            active_seq: Vec::new(),
            next_seq:   0,
            prewarm,
            max_active: max_active.max(1),
            trajectory_capacity,
            trajectory_stride,
            stats:      PoolStats::default(),
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(
            config.pool_prewarm,
            config.max_active_cyclists,
            config.trajectory_capacity,
            config.trajectory_stride,
        )
    }

    /// Create free records up to the pre-warm size.
    pub fn prewarm(&mut self) {
        while self.records.len() < self.prewarm {
            let id = self.create();
            self.free.push(id);
        }
        // Hand out low ids first.
        self.free.sort_unstable_by(|a, b| b.cmp(a));
    }

    fn create(&mut self) -> CyclistId {
        let id = CyclistId(self.records.len() as u32);
        self.records.push(Cyclist::blank(id, self.trajectory_capacity, self.trajectory_stride));
        self.active_seq.push(None);
        self.stats.created += 1;
        id
    }

    /// Hand out a record for a new trip, recycling the oldest active one at
    /// the cap.  The record is `Waiting { until: now }` with a fresh
    /// generation; the caller fills in the trip.
    pub fn acquire(&mut self, now: SimTime) -> Acquired {
        let mut recycled = false;
        let id = match self.take_oldest_if_full() {
            Some(id) => {
                recycled = true;
                id
            }
            None => match self.free.pop() {
                Some(id) => id,
                None => self.create(),
            },
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        self.active.insert(seq, id);
        self.active_seq[id.index()] = Some(seq);
        self.stats.acquired += 1;

        let c = &mut self.records[id.index()];
        c.generation = c.generation.wrapping_add(1);
        c.state = CyclistState::Waiting { until: now };
        c.last_active = now;
        Acquired { id, generation: c.generation, recycled }
    }

    fn take_oldest_if_full(&mut self) -> Option<CyclistId> {
        if self.active.len() < self.max_active {
            return None;
        }
        let (_, id) = self.active.pop_first()?;
        self.active_seq[id.index()] = None;
        self.stats.forced_recycles += 1;
        let c = &self.records[id.index()];
        warn!(cyclist = %id, state = %c.state, active = self.active.len() + 1, "pool at capacity, recycling oldest cyclist");
        Some(id)
    }

    /// Return an active record to the free list.
    pub fn release(&mut self, id: CyclistId) -> MobilityResult<()> {
        let seq = self
            .active_seq
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(MobilityError::NotActive(id))?;
        self.active.remove(&seq);

        let c = &mut self.records[id.index()];
        c.state = CyclistState::Reclaimed;
        c.generation = c.generation.wrapping_add(1);
        self.free.push(id);
        self.stats.released += 1;
        Ok(())
    }

    /// Release every active record.
    pub fn release_all(&mut self) {
        let ids: Vec<CyclistId> = self.active.values().copied().collect();
        for id in ids {
            // Every id came from `active`, so release cannot fail.
            let _ = self.release(id);
        }
    }

    /// Reclaim records idle for more than `timeout_secs`, then trim free
    /// records beyond the pre-warm size.
    pub fn sweep_idle(&mut self, now: SimTime, timeout_secs: f64) -> SweepReport {
        let idle: Vec<CyclistId> = self
            .active
            .values()
            .copied()
            .filter(|id| now.since(self.records[id.index()].last_active) > timeout_secs)
            .collect();
        for &id in &idle {
            let _ = self.release(id);
        }
        self.stats.idle_reclaimed += idle.len() as u64;

        let mut trimmed = 0;
        for &id in self.free.iter().skip(self.prewarm) {
            let c = &mut self.records[id.index()];
            if c.trajectory.allocated() > 0 || !c.route.is_empty() {
                c.trajectory.release_memory();
                c.route = Arc::from(Vec::new());
                trimmed += 1;
            }
        }
        self.stats.trimmed += trimmed as u64;

        if !idle.is_empty() || trimmed > 0 {
            debug!(reclaimed = idle.len(), trimmed, active = self.active.len(), "idle sweep");
        }
        SweepReport { reclaimed: idle, trimmed }
    }

    // ── Access ────────────────────────────────────────────────────────────

    pub fn get(&self, id: CyclistId) -> Option<&Cyclist> {
        self.records.get(id.index())
    }

    pub fn get_mut(&mut self, id: CyclistId) -> Option<&mut Cyclist> {
        self.records.get_mut(id.index())
    }

    /// `true` if `id` is active and still on `generation`.
    pub fn is_current(&self, id: CyclistId, generation: u32) -> bool {
        self.active_seq.get(id.index()).is_some_and(Option::is_some)
            && self.records[id.index()].generation == generation
    }

    /// Active records, oldest first.
    pub fn iter_active(&self) -> impl Iterator<Item = &Cyclist> + '_ {
        self.active.values().map(|id| &self.records[id.index()])
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn total_records(&self) -> usize {
        self.records.len()
    }

    pub fn max_active(&self) -> usize {
        self.max_active
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = PoolStats::default();
    }
}
