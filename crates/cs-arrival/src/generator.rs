//! Arrival generator: decides where, when, who, and whither.
//!
//! Each arrival consumes random draws in a fixed order, which keeps runs
//! reproducible for a given seed:
//!
//! 1. origin, weighted by each node's implied arrival rate;
//! 2. delay until that arrival, from the origin's distribution;
//! 3. rider profile, weighted by configured probability;
//! 4. destination, from the route matrix row or uniformly among the other
//!    nodes.
//!
//! Steps 1–2 happen when an arrival is scheduled and 3–4 when it fires.
//! Route resolution and cyclist acquisition belong to the scheduler.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use cs_core::{NodeId, ProfileId, SimRng};
use cs_spatial::ProfileSet;

use crate::distribution::ArrivalDistribution;
use crate::matrix::RouteMatrix;
use crate::picker::WeightedPicker;
use crate::{ArrivalError, ArrivalResult};

pub struct ArrivalGenerator {
    node_count:    usize,
    distributions: BTreeMap<NodeId, ArrivalDistribution>,
    origins:       WeightedPicker<NodeId>,
    profiles:      WeightedPicker<ProfileId>,
    matrix:        RouteMatrix,
    spawn_counts:  Vec<u64>,
}

impl ArrivalGenerator {
    /// `distributions` binds one distribution to each origin node; nodes
    /// without one never spawn cyclists.
    pub fn new<I>(node_count: usize, distributions: I, profiles: &ProfileSet) -> ArrivalResult<Self>
    where
        I: IntoIterator<Item = (NodeId, ArrivalDistribution)>,
    {
        let mut bound = BTreeMap::new();
        for (node, dist) in distributions {
            if node.index() >= node_count {
                return Err(ArrivalError::NodeNotFound(node));
            }
            if bound.insert(node, dist).is_some() {
                warn!(%node, "distribution bound twice, keeping the last one");
            }
        }
        if bound.is_empty() {
            return Err(ArrivalError::NoOrigins);
        }

        let origins = origin_picker(&bound)?;
        let entries: Vec<(ProfileId, f64)> = profiles.iter().map(|p| (p.id, p.probability)).collect();
        let profiles = WeightedPicker::from_probabilities(entries, "profile table")?;
        let spawn_counts = vec![0; profiles.len()];

        Ok(Self {
            node_count,
            distributions: bound,
            origins,
            profiles,
            matrix: RouteMatrix::new(),
            spawn_counts,
        })
    }

    pub fn with_route_matrix(mut self, matrix: RouteMatrix) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn set_route_matrix(&mut self, matrix: RouteMatrix) {
        self.matrix = matrix;
    }

    pub fn route_matrix(&self) -> &RouteMatrix {
        &self.matrix
    }

    pub fn distribution(&self, node: NodeId) -> Option<&ArrivalDistribution> {
        self.distributions.get(&node)
    }

    pub fn distributions(&self) -> impl Iterator<Item = (NodeId, &ArrivalDistribution)> + '_ {
        self.distributions.iter().map(|(&n, d)| (n, d))
    }

    /// Replace the parameters of `node`'s distribution in place and reweight
    /// origin selection.
    pub fn reconfigure(&mut self, node: NodeId, params: &[f64]) -> ArrivalResult<()> {
        let dist = self
            .distributions
            .get_mut(&node)
            .ok_or(ArrivalError::NodeNotFound(node))?;
        dist.reconfigure(params)?;
        debug!(%node, distribution = %dist, "distribution reconfigured");
        self.origins = origin_picker(&self.distributions)?;
        Ok(())
    }

    // ── Draws ─────────────────────────────────────────────────────────────

    pub fn next_origin(&self, rng: &mut SimRng) -> NodeId {
        *self.origins.pick(rng)
    }

    /// Seconds until the next arrival at `origin`.  Nodes without a
    /// distribution yield the fallback delay.
    pub fn sample_delay(&self, origin: NodeId, rng: &mut SimRng) -> f64 {
        self.distributions
            .get(&origin)
            .map_or(crate::distribution::FALLBACK_DELAY_SECS, |d| d.sample(rng))
    }

    /// Origin and delay of the next arrival.
    pub fn schedule_next(&self, rng: &mut SimRng) -> (NodeId, f64) {
        let origin = self.next_origin(rng);
        (origin, self.sample_delay(origin, rng))
    }

    pub fn pick_profile(&self, rng: &mut SimRng) -> ProfileId {
        *self.profiles.pick(rng)
    }

    /// Destination for a trip from `origin`.  Never returns `origin` while
    /// the network has at least two nodes.
    pub fn pick_destination(&self, origin: NodeId, rng: &mut SimRng) -> NodeId {
        if let Some(dest) = self.matrix.pick(origin, rng) {
            return dest;
        }
        if self.node_count < 2 {
            return origin;
        }
        let i = rng.gen_range(0..self.node_count - 1);
        let i = if i >= origin.index() { i + 1 } else { i };
        NodeId(i as u32)
    }

    // ── Counters ──────────────────────────────────────────────────────────

    pub fn record_spawn(&mut self, profile: ProfileId) {
        if let Some(c) = self.spawn_counts.get_mut(profile.index()) {
            *c += 1;
        }
    }

    /// Spawns per profile, indexed by `ProfileId`.
    pub fn spawn_counts(&self) -> &[u64] {
        &self.spawn_counts
    }

    pub fn reset_counts(&mut self) {
        self.spawn_counts.iter_mut().for_each(|c| *c = 0);
    }
}

fn origin_picker(distributions: &BTreeMap<NodeId, ArrivalDistribution>) -> ArrivalResult<WeightedPicker<NodeId>> {
    let entries = distributions.iter().map(|(&n, d)| (n, d.implied_rate())).collect();
    WeightedPicker::new(entries, "origin rates")
}
