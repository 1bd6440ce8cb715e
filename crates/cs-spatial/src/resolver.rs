//! Profile-weighted route resolution with memoization.
//!
//! The resolver owns the current network and profile table (shared via
//! `Arc`), one lazily materialized cost view per profile, and the
//! [`RouteCache`].  Replacing either input invalidates every view and every
//! cached route.
//!
//! When the weighted search finds nothing, resolution falls back to the
//! fewest-hop path before reporting [`SpatialError::NoRoute`].  Fallback
//! routes are not cached.

use std::sync::Arc;

use cs_core::{NodeId, ProfileId};
use tracing::warn;

use crate::cache::{CacheBudget, CacheStats, RouteCache, RouteKey};
use crate::network::RoadNetwork;
use crate::profile::ProfileSet;
use crate::router::{fewest_hops, DijkstraRouter, Route, Router};
use crate::{SpatialError, SpatialResult};

/// A resolved node path plus how it was obtained.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedRoute {
    pub path:       Arc<[NodeId]>,
    pub from_cache: bool,
    /// `true` if the weighted search failed and the fewest-hop path was used.
    pub fallback:   bool,
}

impl ResolvedRoute {
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

pub struct RouteResolver<R: Router = DijkstraRouter> {
    network:   Arc<RoadNetwork>,
    profiles:  Arc<ProfileSet>,
    router:    R,
    views:     Vec<Option<Vec<f64>>>,
    cache:     RouteCache,
    fallbacks: u64,
}

impl RouteResolver<DijkstraRouter> {
    pub fn new(network: Arc<RoadNetwork>, profiles: Arc<ProfileSet>) -> Self {
        Self::with_router(network, profiles, DijkstraRouter)
    }
}

impl<R: Router> RouteResolver<R> {
    /// Resolver with a custom routing engine.  The cache budget is sized
    /// from the network via [`CacheBudget::for_graph`].
    pub fn with_router(network: Arc<RoadNetwork>, profiles: Arc<ProfileSet>, router: R) -> Self {
        let budget = CacheBudget::for_graph(network.node_count());
        let views = vec![None; profiles.len()];
        Self {
            network,
            profiles,
            router,
            views,
            cache: RouteCache::new(budget),
            fallbacks: 0,
        }
    }

    /// Replace the cache with an empty one using `budget`.
    pub fn with_budget(mut self, budget: CacheBudget) -> Self {
        self.cache = RouteCache::new(budget);
        self
    }

    pub fn network(&self) -> &Arc<RoadNetwork> {
        &self.network
    }

    pub fn profiles(&self) -> &Arc<ProfileSet> {
        &self.profiles
    }

    /// Swap in a reloaded network.  All views and cached routes are dropped
    /// and the cache budget is resized for the new graph.
    pub fn set_network(&mut self, network: Arc<RoadNetwork>) {
        self.network = network;
        self.cache = RouteCache::new(CacheBudget::for_graph(self.network.node_count()));
        self.invalidate();
    }

    pub fn set_profiles(&mut self, profiles: Arc<ProfileSet>) {
        self.profiles = profiles;
        self.invalidate();
    }

    /// Drop every cost view and cached route.
    pub fn invalidate(&mut self) {
        self.views = vec![None; self.profiles.len()];
        self.cache.invalidate();
    }

    /// Resolve `origin → destination` for `profile`, consulting the cache
    /// first.
    pub fn resolve(
        &mut self,
        profile:     ProfileId,
        origin:      NodeId,
        destination: NodeId,
    ) -> SpatialResult<ResolvedRoute> {
        let key = RouteKey::new(profile, origin, destination);
        if let Some(path) = self.cache.get(&key) {
            return Ok(ResolvedRoute { path, from_cache: true, fallback: false });
        }

        match self.resolve_uncached(profile, origin, destination) {
            Ok(route) => {
                let path: Arc<[NodeId]> = route.nodes.into();
                self.cache.insert(key, Arc::clone(&path));
                Ok(ResolvedRoute { path, from_cache: false, fallback: false })
            }
            Err(SpatialError::NoRoute { .. }) => {
                let route = fewest_hops(&self.network, origin, destination)?;
                self.fallbacks += 1;
                warn!(
                    profile = %profile,
                    origin = self.network.label(origin),
                    destination = self.network.label(destination),
                    hops = route.hop_count(),
                    "weighted search failed, using fewest-hop route"
                );
                Ok(ResolvedRoute { path: route.nodes.into(), from_cache: false, fallback: true })
            }
            Err(e) => Err(e),
        }
    }

    /// Weighted search without touching the cache or the fallback.
    pub fn resolve_uncached(
        &mut self,
        profile:     ProfileId,
        origin:      NodeId,
        destination: NodeId,
    ) -> SpatialResult<Route> {
        self.ensure_view(profile)?;
        let costs = self.views[profile.index()].as_deref().unwrap_or(&[]);
        self.router.route(&self.network, costs, origin, destination)
    }

    /// The materialized per-edge cost view of `profile`.
    pub fn cost_view(&mut self, profile: ProfileId) -> SpatialResult<&[f64]> {
        self.ensure_view(profile)?;
        Ok(self.views[profile.index()].as_deref().unwrap_or(&[]))
    }

    fn ensure_view(&mut self, profile: ProfileId) -> SpatialResult<()> {
        let p = self
            .profiles
            .get(profile)
            .ok_or(SpatialError::UnknownProfile(profile))?;
        if self.views.len() < self.profiles.len() {
            self.views.resize(self.profiles.len(), None);
        }
        let slot = &mut self.views[profile.index()];
        if slot.is_none() {
            let ranges = self.network.ranges();
            let view = self
                .network
                .edge_attrs
                .iter()
                .map(|attrs| p.edge_cost(attrs, ranges))
                .collect();
            *slot = Some(view);
        }
        Ok(())
    }

    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Number of resolutions served by the fewest-hop fallback.
    pub fn fallback_count(&self) -> u64 {
        self.fallbacks
    }
}
