//! The `Simulation` struct: scenario configuration plus the run-state
//! machine around one [`SimulationContext`].

use std::sync::Arc;

use tracing::info;

use cs_arrival::{ArrivalDistribution, ArrivalError, ArrivalGenerator, DistributionSpec, RouteMatrix};
use cs_core::{CyclistId, NodeId, SimConfig, SimTime};
use cs_mobility::Cyclist;
use cs_spatial::{DijkstraRouter, ProfileSet, RoadNetwork, RouteResolver, Router};

use crate::context::SimulationContext;
use crate::observer::{NoopObserver, SimObserver};
use crate::queue::EventKind;
use crate::stats::{CyclistView, SimStatistics};
use crate::{RunState, SimError, SimResult};

/// The scheduler.
///
/// Scenario inputs (graph, profiles, distributions, optional route matrix)
/// are configured while `Stopped`.  [`initialize`](Self::initialize) builds
/// the [`SimulationContext`] and queues the first events; every
/// [`step`](Self::step) then pops and handles exactly one event:
///
/// | Event       | Effect                                                       |
/// |-------------|--------------------------------------------------------------|
/// | `Arrival`   | pick profile + destination, resolve, spawn, schedule next     |
/// | `MoveStep`  | advance one interpolation step, roll to next hop or complete  |
/// | `Horizon`   | `Running → Completed`; the queue keeps going                  |
/// | `IdleSweep` | reclaim idle pool records                                     |
///
/// Create directly or via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation<R: Router + Clone = DijkstraRouter> {
    config: SimConfig,
    router: R,

    network:       Option<Arc<RoadNetwork>>,
    profiles:      Option<Arc<ProfileSet>>,
    distributions: Vec<(NodeId, ArrivalDistribution)>,
    matrix:        RouteMatrix,

    /// Built lazily by `initialize()`; dropped when a scenario input changes.
    ctx:   Option<SimulationContext<R>>,
    state: RunState,
}

impl Simulation<DijkstraRouter> {
    pub fn new(config: SimConfig) -> SimResult<Self> {
        Self::with_router(config, DijkstraRouter)
    }
}

impl<R: Router + Clone> Simulation<R> {
    pub fn with_router(config: SimConfig, router: R) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            router,
            network:       None,
            profiles:      None,
            distributions: Vec::new(),
            matrix:        RouteMatrix::new(),
            ctx:           None,
            state:         RunState::Stopped,
        })
    }

    // ── Configuration ─────────────────────────────────────────────────────

    /// Validate and install the road network.  Cached routes and any built
    /// context are discarded.
    pub fn configure_graph(&mut self, network: RoadNetwork) -> SimResult<()> {
        self.ensure_stopped("configure the graph")?;
        network.validate(self.config.require_connected_graph)?;
        info!(
            nodes = network.node_count(),
            roads = network.road_count(),
            "road network configured"
        );
        self.network = Some(Arc::new(network));
        self.discard_context();
        Ok(())
    }

    pub fn configure_profiles(&mut self, profiles: ProfileSet) -> SimResult<()> {
        self.ensure_stopped("configure profiles")?;
        info!(profiles = profiles.len(), "rider profiles configured");
        self.profiles = Some(Arc::new(profiles));
        self.discard_context();
        Ok(())
    }

    /// Bind one arrival distribution per node.  Specs are parsed strictly;
    /// any unknown kind, wrong arity or non-finite parameter rejects the
    /// whole batch.
    pub fn configure_distributions<I>(&mut self, specs: I) -> SimResult<()>
    where
        I: IntoIterator<Item = (NodeId, DistributionSpec)>,
    {
        self.ensure_stopped("configure distributions")?;
        let mut built = Vec::new();
        for (node, spec) in specs {
            if let Some(network) = &self.network {
                if !network.contains(node) {
                    return Err(ArrivalError::NodeNotFound(node).into());
                }
            }
            built.push((node, spec.build()?));
        }
        info!(origins = built.len(), "arrival distributions configured");
        self.distributions = built;
        self.discard_context();
        Ok(())
    }

    /// Replace the parameters of one node's distribution.  Allowed in any
    /// state; takes effect from the next scheduled arrival.
    pub fn reconfigure_distribution(&mut self, node: NodeId, params: &[f64]) -> SimResult<()> {
        let dist = self
            .distributions
            .iter_mut()
            .find(|(n, _)| *n == node)
            .map(|(_, d)| d)
            .ok_or(ArrivalError::NodeNotFound(node))?;
        dist.reconfigure(params)?;
        if let Some(ctx) = self.ctx.as_mut() {
            ctx.generator.reconfigure(node, params)?;
        }
        Ok(())
    }

    /// Install an origin → destination probability table.  Origins without
    /// a row keep the uniform choice.
    pub fn configure_route_matrix(&mut self, matrix: RouteMatrix) -> SimResult<()> {
        self.ensure_stopped("configure the route matrix")?;
        if let Some(network) = &self.network {
            if let Some(node) = matrix.nodes().find(|&n| !network.contains(n)) {
                return Err(ArrivalError::NodeNotFound(node).into());
            }
        }
        if let Some(ctx) = self.ctx.as_mut() {
            ctx.generator.set_route_matrix(matrix.clone());
        }
        info!(rows = matrix.row_count(), "route matrix configured");
        self.matrix = matrix;
        Ok(())
    }

    fn ensure_stopped(&self, action: &'static str) -> SimResult<()> {
        if self.state == RunState::Stopped {
            Ok(())
        } else {
            Err(SimError::InvalidState { action, state: self.state })
        }
    }

    fn discard_context(&mut self) {
        if self.ctx.take().is_some() {
            info!("scenario changed, route cache and cyclist pool discarded");
        }
    }

    fn build_context(&self) -> SimResult<SimulationContext<R>> {
        let network = self.network.as_ref().ok_or(SimError::NotConfigured("road network"))?;
        let profiles = self.profiles.as_ref().ok_or(SimError::NotConfigured("rider profiles"))?;
        if self.distributions.is_empty() {
            return Err(SimError::NotConfigured("arrival distributions"));
        }
        if let Some(node) = self.matrix.nodes().find(|&n| !network.contains(n)) {
            return Err(ArrivalError::NodeNotFound(node).into());
        }

        let generator = ArrivalGenerator::new(
            network.node_count(),
            self.distributions.iter().copied(),
            profiles,
        )?
        .with_route_matrix(self.matrix.clone());
        let resolver = RouteResolver::with_router(
            Arc::clone(network),
            Arc::clone(profiles),
            self.router.clone(),
        );
        Ok(SimulationContext::new(self.config.clone(), resolver, generator))
    }

    // ── Run control ───────────────────────────────────────────────────────

    /// Start a run from time zero: build the context if needed, rewind it,
    /// pre-warm the pool and queue the first arrival, the horizon and the
    /// idle sweep.  `Stopped | Completed → Running`.
    pub fn initialize(&mut self) -> SimResult<()> {
        if matches!(self.state, RunState::Running | RunState::Paused) {
            return Err(SimError::InvalidState { action: "initialize", state: self.state });
        }
        if self.ctx.is_none() {
            self.ctx = Some(self.build_context()?);
        }
        let Some(ctx) = self.ctx.as_mut() else {
            return Err(SimError::NotConfigured("simulation context"));
        };
        ctx.rewind();
        ctx.schedule_initial();
        info!(
            seed = self.config.seed,
            horizon_secs = self.config.horizon_secs,
            pending = ctx.pending_events(),
            "simulation initialized"
        );
        self.state = RunState::Running;
        Ok(())
    }

    /// Process one event.  Returns whether events remain.
    ///
    /// `Running` and `Completed` process; `Paused` processes nothing but
    /// reports the pending queue; `Stopped` returns `false`.
    pub fn step(&mut self) -> bool {
        self.step_with(&mut NoopObserver)
    }

    pub fn step_with<O: SimObserver>(&mut self, observer: &mut O) -> bool {
        if !self.state.accepts_steps() {
            return self.state == RunState::Paused && self.has_pending();
        }
        let Some(ctx) = self.ctx.as_mut() else {
            return false;
        };
        let Some(event) = ctx.queue.pop() else {
            return false;
        };
        ctx.process(event, observer);
        let now = ctx.now;

        if event.kind == EventKind::Horizon && self.state == RunState::Running {
            self.state = RunState::Completed;
            info!(%now, "horizon reached, run marked completed");
            observer.on_state_change(now, RunState::Running, RunState::Completed);
        }
        self.has_pending()
    }

    /// Process every event due at or before `until`.  Returns the number of
    /// events processed.
    pub fn run_until(&mut self, until: SimTime) -> usize {
        self.run_until_with(until, &mut NoopObserver)
    }

    pub fn run_until_with<O: SimObserver>(&mut self, until: SimTime, observer: &mut O) -> usize {
        let mut processed = 0;
        while self.state.accepts_steps() {
            match self.ctx.as_ref().and_then(|c| c.queue.peek_time()) {
                Some(t) if t <= until => {}
                _ => break,
            }
            self.step_with(observer);
            processed += 1;
        }
        processed
    }

    /// Step until the horizon event marks the run `Completed` (or the queue
    /// drains).  Returns the number of events processed.
    pub fn run_to_horizon(&mut self) -> usize {
        self.run_to_horizon_with(&mut NoopObserver)
    }

    pub fn run_to_horizon_with<O: SimObserver>(&mut self, observer: &mut O) -> usize {
        let mut processed = 0;
        while self.state == RunState::Running && self.has_pending() {
            self.step_with(observer);
            processed += 1;
        }
        processed
    }

    /// `Running → Paused`.  Pausing an already paused run is a no-op.
    pub fn pause(&mut self) -> SimResult<()> {
        match self.state {
            RunState::Running => {
                self.state = RunState::Paused;
                info!(now = %self.now(), "simulation paused");
                Ok(())
            }
            RunState::Paused => Ok(()),
            state => Err(SimError::InvalidState { action: "pause", state }),
        }
    }

    /// `Paused → Running`.  Resuming a running run is a no-op.
    pub fn resume(&mut self) -> SimResult<()> {
        match self.state {
            RunState::Paused => {
                self.state = RunState::Running;
                info!(now = %self.now(), "simulation resumed");
                Ok(())
            }
            RunState::Running => Ok(()),
            state => Err(SimError::InvalidState { action: "resume", state }),
        }
    }

    /// Tear down the timeline: every pending event is dropped.  Cyclists
    /// keep their last state until `reset()` or the next `initialize()`.
    pub fn stop(&mut self) {
        if let Some(ctx) = self.ctx.as_mut() {
            ctx.queue.clear();
        }
        if self.state != RunState::Stopped {
            info!(now = %self.now(), "simulation stopped");
        }
        self.state = RunState::Stopped;
    }

    /// Back to `Stopped` at time zero with every cyclist released and all
    /// counters cleared.  Scenario inputs and cached routes are kept.
    pub fn reset(&mut self) {
        if let Some(ctx) = self.ctx.as_mut() {
            ctx.rewind();
        }
        self.state = RunState::Stopped;
        info!("simulation reset");
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn now(&self) -> SimTime {
        self.ctx.as_ref().map_or(SimTime::ZERO, |c| c.now)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn network(&self) -> Option<&RoadNetwork> {
        self.network.as_deref()
    }

    pub fn profiles(&self) -> Option<&ProfileSet> {
        self.profiles.as_deref()
    }

    pub fn context(&self) -> Option<&SimulationContext<R>> {
        self.ctx.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.ctx.as_ref().is_some_and(|c| !c.queue.is_empty())
    }

    pub fn pending_events(&self) -> usize {
        self.ctx.as_ref().map_or(0, |c| c.pending_events())
    }

    /// Record of `id`, for trajectory access.
    pub fn cyclist(&self, id: CyclistId) -> Option<&Cyclist> {
        self.ctx.as_ref().and_then(|c| c.pool.get(id))
    }

    /// Active cyclists, oldest first.
    pub fn active_cyclists(&self) -> Vec<CyclistView> {
        match &self.ctx {
            Some(ctx) => ctx.pool.iter_active().map(CyclistView::of).collect(),
            None => Vec::new(),
        }
    }

    pub fn statistics(&self) -> SimStatistics {
        let Some(ctx) = &self.ctx else {
            return SimStatistics::default();
        };
        let c = ctx.counters;
        let pool = ctx.pool.stats();
        let cache = ctx.resolver.cache_stats();
        SimStatistics {
            now_secs:           ctx.now.as_secs(),
            spawned:            c.spawned,
            completed:          c.completed,
            active:             ctx.pool.active_count(),
            no_path:            c.no_path,
            fallback_routes:    c.fallback_routes,
            forced_recycles:    pool.forced_recycles,
            idle_reclaimed:     pool.idle_reclaimed,
            events_processed:   c.events_processed,
            stale_events:       c.stale_events,
            cache_hits:         cache.hits,
            cache_misses:       cache.misses,
            cache_evictions:    cache.evictions,
            cache_entries:      ctx.resolver.cache().len(),
            spawns_per_profile: ctx.generator.spawn_counts().to_vec(),
            total_distance_m:   c.total_distance_m,
            total_travel_secs:  c.total_travel_secs,
        }
    }
}
