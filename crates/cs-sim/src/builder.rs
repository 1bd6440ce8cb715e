//! Fluent builder for constructing a [`Simulation`].

use cs_arrival::{ArrivalDistribution, DistributionSpec, RouteMatrix};
use cs_core::{NodeId, SimConfig};
use cs_spatial::{DijkstraRouter, ProfileSet, RoadNetwork, Router};

use crate::{SimResult, Simulation};

/// Fluent builder for [`Simulation<R>`].
///
/// # Required inputs
///
/// | Method                     | Meaning                                   |
/// |----------------------------|-------------------------------------------|
/// | `.network(n)`              | road network (validated on `build`)       |
/// | `.profiles(p)`             | rider profile table                       |
/// | `.distributions(v)` / `.arrival(node, d)` | at least one origin          |
///
/// # Optional inputs
///
/// | Method                     | Default                                   |
/// |----------------------------|-------------------------------------------|
/// | `.route_matrix(m)`         | uniform destinations                      |
/// | `SimBuilder::with_router`  | [`DijkstraRouter`]                        |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .network(network)
///     .profiles(profiles)
///     .arrival(a, ArrivalDistribution::exponential(0.5))
///     .build()?;
/// sim.initialize()?;
/// while sim.step() {}
/// ```
pub struct SimBuilder<R: Router + Clone = DijkstraRouter> {
    config:        SimConfig,
    router:        R,
    network:       Option<RoadNetwork>,
    profiles:      Option<ProfileSet>,
    distributions: Vec<(NodeId, DistributionSpec)>,
    matrix:        Option<RouteMatrix>,
}

impl SimBuilder<DijkstraRouter> {
    pub fn new(config: SimConfig) -> Self {
        Self::with_router(config, DijkstraRouter)
    }
}

impl<R: Router + Clone> SimBuilder<R> {
    pub fn with_router(config: SimConfig, router: R) -> Self {
        Self {
            config,
            router,
            network:       None,
            profiles:      None,
            distributions: Vec::new(),
            matrix:        None,
        }
    }

    pub fn network(mut self, network: RoadNetwork) -> Self {
        self.network = Some(network);
        self
    }

    pub fn profiles(mut self, profiles: ProfileSet) -> Self {
        self.profiles = Some(profiles);
        self
    }

    /// Add unparsed distribution specs (e.g. from a CSV table).
    pub fn distributions(mut self, specs: impl IntoIterator<Item = (NodeId, DistributionSpec)>) -> Self {
        self.distributions.extend(specs);
        self
    }

    /// Bind an already-built distribution to `node`.
    pub fn arrival(mut self, node: NodeId, distribution: ArrivalDistribution) -> Self {
        let spec = DistributionSpec::new(distribution.kind().as_str(), distribution.params());
        self.distributions.push((node, spec));
        self
    }

    pub fn route_matrix(mut self, matrix: RouteMatrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// Validate every input and return a `Stopped` simulation ready for
    /// [`initialize`](Simulation::initialize).  Missing inputs surface there
    /// as [`SimError::NotConfigured`](crate::SimError::NotConfigured).
    pub fn build(self) -> SimResult<Simulation<R>> {
        let mut sim = Simulation::with_router(self.config, self.router)?;
        if let Some(network) = self.network {
            sim.configure_graph(network)?;
        }
        if let Some(profiles) = self.profiles {
            sim.configure_profiles(profiles)?;
        }
        if !self.distributions.is_empty() {
            sim.configure_distributions(self.distributions)?;
        }
        if let Some(matrix) = self.matrix {
            sim.configure_route_matrix(matrix)?;
        }
        Ok(sim)
    }
}
