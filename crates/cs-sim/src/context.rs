//! `SimulationContext` — everything one simulated timeline mutates.
//!
//! The context is owned by [`Simulation`](crate::Simulation) and only
//! touched from its `step()`.  Event handlers borrow disjoint fields of it,
//! so no subsystem reaches for shared state on its own.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use cs_arrival::ArrivalGenerator;
use cs_core::{CyclistId, NodeId, ProfileId, SimConfig, SimRng, SimTime};
use cs_mobility::{CyclistPool, CyclistState, MovementInterpolator};
use cs_spatial::{DijkstraRouter, ResolvedRoute, RoadNetwork, RouteResolver, Router};

use crate::observer::SimObserver;
use crate::queue::{Event, EventKind, EventQueue};
use crate::stats::RunCounters;

pub struct SimulationContext<R: Router = DijkstraRouter> {
    pub config:       SimConfig,
    pub resolver:     RouteResolver<R>,
    pub generator:    ArrivalGenerator,
    pub pool:         CyclistPool,
    pub interpolator: MovementInterpolator,
    pub rng:          SimRng,
    pub queue:        EventQueue,
    /// Virtual clock; only ever set from popped events.
    pub now:          SimTime,

    pub(crate) counters: RunCounters,
}

impl<R: Router> SimulationContext<R> {
    pub fn new(config: SimConfig, resolver: RouteResolver<R>, generator: ArrivalGenerator) -> Self {
        Self {
            pool:         CyclistPool::from_config(&config),
            interpolator: MovementInterpolator::from_config(&config),
            rng:          SimRng::new(config.seed),
            queue:        EventQueue::new(),
            now:          SimTime::ZERO,
            counters:     RunCounters::default(),
            config,
            resolver,
            generator,
        }
    }

    pub fn network(&self) -> &RoadNetwork {
        self.resolver.network()
    }

    pub fn horizon(&self) -> SimTime {
        SimTime::from_secs(self.config.horizon_secs)
    }

    /// Put the timeline back at zero: every cyclist released, queue emptied,
    /// RNG reseeded, counters cleared.  The route cache survives.
    pub fn rewind(&mut self) {
        self.pool.release_all();
        self.pool.reset_stats();
        self.queue.clear();
        self.rng = SimRng::new(self.config.seed);
        self.now = SimTime::ZERO;
        self.counters = RunCounters::default();
        self.generator.reset_counts();
    }

    /// Pre-warm the pool and queue the first arrival, the horizon and the
    /// first idle sweep.
    pub fn schedule_initial(&mut self) {
        self.pool.prewarm();
        self.schedule_arrival();
        self.queue.push(self.horizon(), EventKind::Horizon);
        self.queue
            .push(self.now.after(self.config.idle_sweep_interval_secs), EventKind::IdleSweep);
    }

    /// Handle one popped event.  `Horizon` only advances the clock here; the
    /// run-state change belongs to the caller.
    pub fn process<O: SimObserver>(&mut self, event: Event, observer: &mut O) {
        if event.time > self.now {
            self.now = event.time;
        }
        self.counters.events_processed += 1;
        observer.on_event(&event);
        trace!(time = %event.time, event = %event.kind, "event");

        match event.kind {
            EventKind::Arrival { origin } => self.handle_arrival(origin, observer),
            EventKind::MoveStep { cyclist, generation } => self.handle_move(cyclist, generation, observer),
            EventKind::IdleSweep => self.handle_idle_sweep(),
            EventKind::Horizon => {}
        }
    }

    // ── Arrivals ──────────────────────────────────────────────────────────

    fn schedule_arrival(&mut self) {
        let (origin, delay) = self.generator.schedule_next(&mut self.rng);
        self.queue.push(self.now.after(delay), EventKind::Arrival { origin });
    }

    fn generation_open(&self) -> bool {
        !(self.config.stop_generation_at_horizon && self.now >= self.horizon())
    }

    fn handle_arrival<O: SimObserver>(&mut self, origin: NodeId, observer: &mut O) {
        if !self.generation_open() {
            debug!(%origin, "arrival after horizon dropped");
            return;
        }

        let profile = self.generator.pick_profile(&mut self.rng);
        let destination = self.generator.pick_destination(origin, &mut self.rng);

        match self.resolver.resolve(profile, origin, destination) {
            Ok(route) if route.hop_count() > 0 => {
                self.spawn(profile, route, observer);
                self.schedule_arrival();
            }
            Ok(_) => self.abandon_arrival(origin, destination, "origin equals destination", observer),
            Err(e) => self.abandon_arrival(origin, destination, &e.to_string(), observer),
        }
    }

    /// Give up on an arrival and retry after the fixed delay from a freshly
    /// drawn origin.
    fn abandon_arrival<O: SimObserver>(
        &mut self,
        origin:      NodeId,
        destination: NodeId,
        reason:      &str,
        observer:    &mut O,
    ) {
        self.counters.no_path += 1;
        warn!(
            %origin,
            %destination,
            reason,
            "no path for arrival, retrying"
        );
        observer.on_no_path(self.now, origin, destination);

        let next = self.generator.next_origin(&mut self.rng);
        self.queue
            .push(self.now.after(self.config.no_path_retry_secs), EventKind::Arrival { origin: next });
    }

    fn spawn<O: SimObserver>(&mut self, profile: ProfileId, route: ResolvedRoute, observer: &mut O) {
        let now = self.now;
        let acquired = self.pool.acquire(now);
        let base_velocity = self
            .rng
            .uniform_in(self.config.velocity_min_mps, self.config.velocity_max_mps);
        let start = match route.path.first() {
            Some(&origin) => self.resolver.network().position(origin),
            None => return,
        };

        let Some(cyclist) = self.pool.get_mut(acquired.id) else {
            return;
        };
        cyclist.begin_trip(profile, route.path, base_velocity, start, now);
        cyclist.fallback_route = route.fallback;

        self.generator.record_spawn(profile);
        self.counters.spawned += 1;
        if route.fallback {
            self.counters.fallback_routes += 1;
        }
        self.queue.push(now, EventKind::MoveStep {
            cyclist:    acquired.id,
            generation: acquired.generation,
        });
        trace!(
            cyclist = %acquired.id,
            %profile,
            hops = cyclist.hop_count(),
            velocity = base_velocity,
            cached = route.from_cache,
            "cyclist spawned"
        );
        observer.on_spawn(now, cyclist);
    }

    // ── Movement ──────────────────────────────────────────────────────────

    fn handle_move<O: SimObserver>(&mut self, id: CyclistId, generation: u32, observer: &mut O) {
        if !self.pool.is_current(id, generation) {
            self.counters.stale_events += 1;
            trace!(cyclist = %id, generation, "stale movement event dropped");
            return;
        }
        let Some(state) = self.pool.get(id).map(|c| c.state) else {
            return;
        };

        match state {
            CyclistState::Waiting { .. } => self.start_hop(id, generation, 0, observer),
            CyclistState::Moving { edge_index, step, .. } => {
                self.advance_step(id, generation, edge_index, step + 1, observer)
            }
            CyclistState::Completed | CyclistState::Reclaimed => {}
        }
    }

    /// Plan hop `edge_index` and schedule its first step.
    fn start_hop<O: SimObserver>(&mut self, id: CyclistId, generation: u32, edge_index: usize, observer: &mut O) {
        let network = Arc::clone(self.resolver.network());
        let now = self.now;
        let Some(cyclist) = self.pool.get_mut(id) else {
            return;
        };
        let Some((from, to)) = cyclist.hop(edge_index) else {
            self.complete(id, observer);
            return;
        };

        let plan = match self.interpolator.plan_hop(&network, from, to, cyclist.base_velocity_mps) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(cyclist = %id, error = %e, "route no longer matches the network, trip dropped");
                let _ = self.pool.release(id);
                return;
            }
        };
        cyclist.state = CyclistState::Moving { edge_index, step: 0, steps: plan.steps };
        cyclist.velocity_mps = plan.velocity_mps;
        cyclist.last_active = now;
        self.queue
            .push(now.after(plan.step_secs()), EventKind::MoveStep { cyclist: id, generation });
    }

    /// Move to `step` of hop `edge_index`; roll over to the next hop or
    /// finish the trip when the hop is done.
    fn advance_step<O: SimObserver>(
        &mut self,
        id:         CyclistId,
        generation: u32,
        edge_index: usize,
        step:       u32,
        observer:   &mut O,
    ) {
        let network = Arc::clone(self.resolver.network());
        let now = self.now;
        let Some(cyclist) = self.pool.get_mut(id) else {
            return;
        };
        let Some((from, to)) = cyclist.hop(edge_index) else {
            self.complete(id, observer);
            return;
        };
        let plan = match self.interpolator.plan_hop(&network, from, to, cyclist.base_velocity_mps) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(cyclist = %id, error = %e, "route no longer matches the network, trip dropped");
                let _ = self.pool.release(id);
                return;
            }
        };

        cyclist.position = plan.position_at(step);
        cyclist.trajectory.record(now, cyclist.position);
        cyclist.last_active = now;

        if step < plan.steps {
            cyclist.state = CyclistState::Moving { edge_index, step, steps: plan.steps };
            self.queue
                .push(now.after(plan.step_secs()), EventKind::MoveStep { cyclist: id, generation });
            return;
        }

        cyclist.distance_m += plan.distance_m;
        if edge_index + 1 < cyclist.hop_count() {
            self.start_hop(id, generation, edge_index + 1, observer);
        } else {
            self.complete(id, observer);
        }
    }

    fn complete<O: SimObserver>(&mut self, id: CyclistId, observer: &mut O) {
        let now = self.now;
        if let Some(cyclist) = self.pool.get_mut(id) {
            cyclist.state = CyclistState::Completed;
            if cyclist.trajectory.last().map(|p| p.time) != Some(now) {
                cyclist.trajectory.push(now, cyclist.position);
            }
            self.counters.completed += 1;
            self.counters.total_distance_m += cyclist.distance_m;
            self.counters.total_travel_secs += cyclist.trip_secs(now);
            trace!(
                cyclist = %id,
                distance_m = cyclist.distance_m,
                secs = cyclist.trip_secs(now),
                "trip completed"
            );
            observer.on_complete(now, cyclist);
        }
        if let Err(e) = self.pool.release(id) {
            warn!(error = %e, "completed cyclist was not active");
        }
    }

    // ── Idle sweep ────────────────────────────────────────────────────────

    /// Reclaim idle records.  The sweep re-arms itself only while something
    /// else is still happening, so a drained timeline ends.
    fn handle_idle_sweep(&mut self) {
        let report = self.pool.sweep_idle(self.now, self.config.idle_timeout_secs);
        if !report.reclaimed.is_empty() {
            debug!(reclaimed = report.reclaimed.len(), "idle cyclists reclaimed");
        }
        if self.pool.active_count() > 0 || !self.queue.is_empty() {
            self.queue
                .push(self.now.after(self.config.idle_sweep_interval_secs), EventKind::IdleSweep);
        }
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }
}
