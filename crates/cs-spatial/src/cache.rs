//! Bounded memo of resolved routes.
//!
//! # Eviction
//!
//! Entries are bucketed per profile in insertion order.  After every insert
//! the budget is checked:
//!
//! - a profile whose bucket exceeds `per_profile` is over quota;
//! - if the cache as a whole exceeds `global`, every profile holding more
//!   than its fair share (`global / profiles`) is over quota too.
//!
//! Each over-quota profile loses the oldest half of its bucket.  This is an
//! approximate LRU that only bounds memory: an evicted route is recomputed
//! on next demand with an identical result.

use std::collections::VecDeque;
use std::sync::Arc;

use cs_core::{NodeId, ProfileId};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Cache key: one route per (profile, origin, destination).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct RouteKey {
    pub profile:     ProfileId,
    pub origin:      NodeId,
    pub destination: NodeId,
}

impl RouteKey {
    pub fn new(profile: ProfileId, origin: NodeId, destination: NodeId) -> Self {
        Self { profile, origin, destination }
    }
}

/// Entry caps.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CacheBudget {
    pub per_profile: usize,
    pub global:      usize,
}

impl CacheBudget {
    /// Caps scaled to graph size; smaller graphs get tighter caps since they
    /// have fewer distinct pairs to begin with.
    pub fn for_graph(node_count: usize) -> Self {
        match node_count {
            0..=50     => CacheBudget { per_profile: 500,    global: 2_000 },
            51..=500   => CacheBudget { per_profile: 5_000,  global: 20_000 },
            501..=5000 => CacheBudget { per_profile: 20_000, global: 100_000 },
            _          => CacheBudget { per_profile: 50_000, global: 250_000 },
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits:          u64,
    pub misses:        u64,
    pub evictions:     u64,
    pub invalidations: u64,
}

/// Route memo keyed by [`RouteKey`] with per-profile insertion-order buckets.
pub struct RouteCache {
    entries: FxHashMap<RouteKey, Arc<[NodeId]>>,
    buckets: FxHashMap<ProfileId, VecDeque<RouteKey>>,
    budget:  CacheBudget,
    stats:   CacheStats,
}

impl RouteCache {
    pub fn new(budget: CacheBudget) -> Self {
        Self {
            entries: FxHashMap::default(),
            buckets: FxHashMap::default(),
            budget,
            stats:   CacheStats::default(),
        }
    }

    /// Look up a route, counting the hit or miss.
    pub fn get(&mut self, key: &RouteKey) -> Option<Arc<[NodeId]>> {
        match self.entries.get(key) {
            Some(path) => {
                self.stats.hits += 1;
                Some(Arc::clone(path))
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Look up without touching the statistics.
    pub fn peek(&self, key: &RouteKey) -> Option<&Arc<[NodeId]>> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &RouteKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert (or replace) a route, then enforce the budget.
    pub fn insert(&mut self, key: RouteKey, path: Arc<[NodeId]>) {
        if self.entries.insert(key, path).is_none() {
            self.buckets.entry(key.profile).or_default().push_back(key);
        }
        self.enforce_budget();
    }

    fn enforce_budget(&mut self) {
        let over_global = self.entries.len() > self.budget.global;
        let fair_share = self.budget.global / self.buckets.len().max(1);

        let mut over: Vec<ProfileId> = self
            .buckets
            .iter()
            .filter(|(_, b)| b.len() > self.budget.per_profile || (over_global && b.len() > fair_share))
            .map(|(&p, _)| p)
            .collect();
        if over.is_empty() {
            return;
        }
        over.sort_unstable();

        for profile in over {
            let Some(bucket) = self.buckets.get_mut(&profile) else { continue };
            let drop = (bucket.len() / 2).max(1);
            for key in bucket.drain(..drop) {
                self.entries.remove(&key);
            }
            self.stats.evictions += drop as u64;
            debug!(profile = %profile, dropped = drop, remaining = bucket.len(), "route cache eviction");
        }
    }

    /// Drop every entry (graph reloaded or reconfigured).
    pub fn invalidate(&mut self) {
        self.entries.clear();
        self.buckets.clear();
        self.stats.invalidations += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn profile_len(&self, profile: ProfileId) -> usize {
        self.buckets.get(&profile).map_or(0, VecDeque::len)
    }

    pub fn budget(&self) -> CacheBudget {
        self.budget
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
