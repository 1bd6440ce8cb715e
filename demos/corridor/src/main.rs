//! corridor — smallest runnable cyclesim scenario.
//!
//! Five stops along a riverside bike corridor, two rider profiles, Poisson
//! arrivals at the two ends and a gamma-distributed trickle from the
//! middle.  Runs to the horizon and logs the counters.
//!
//! ```text
//! cargo run -p corridor                     # built-in config
//! cargo run -p corridor -- config.json      # SimConfig from JSON
//! RUST_LOG=cs_sim=trace cargo run -p corridor
//! ```

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cs_arrival::{load_distributions_reader, load_profiles_reader, load_route_matrix_reader};
use cs_core::{SimConfig, SimTime};
use cs_sim::{EventTrace, SimBuilder};
use cs_spatial::load_network_reader;

mod report;

use report::summarize;

// ── Scenario tables ───────────────────────────────────────────────────────────

// Lat/lon on every node: road lengths come from the haversine distance.
const NODES_CSV: &str = "\
node,x,y,lat,lon
harbour,,,30.6880,-88.0390
market,,,30.6925,-88.0440
bridge,,,30.6970,-88.0475
campus,,,30.7010,-88.0530
park,,,30.6950,-88.0560
";

const ROADS_CSV: &str = "\
origin,destination,distance,safety,luminosity,slope
harbour,market,,6,8,1.0
market,bridge,,7,7,3.5
bridge,campus,,8,5,2.0
campus,park,,9,3,-1.5
park,market,,4,4,0.5
harbour,park,,3,2,0.0
";

const PROFILES_CSV: &str = "\
profile,probability,distance,safety,luminosity,slope
commuter,0.7,1.0,0.2,0.1,0.3
cautious,0.3,0.2,1.0,0.8,0.5
";

const DISTRIBUTIONS_CSV: &str = "\
node,kind,p1,p2
harbour,exponential,0.4,
campus,exponential,0.25,
bridge,gamma,2.0,6.0
";

const ROUTES_CSV: &str = "\
origin,destination,probability
harbour,campus,0.6
harbour,park,0.4
";

const LAYOUT_SEED: u64 = 42;

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig { horizon_secs: 900.0, ..SimConfig::default() });
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: SimConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args().nth(1);
    let config = load_config(config_path.as_deref().map(Path::new))?;

    // 1. Scenario tables.
    let network = load_network_reader(Cursor::new(NODES_CSV), Cursor::new(ROADS_CSV), LAYOUT_SEED)?;
    let profiles = load_profiles_reader(Cursor::new(PROFILES_CSV))?;
    let distributions = load_distributions_reader(Cursor::new(DISTRIBUTIONS_CSV), &network)?;
    let matrix = load_route_matrix_reader(Cursor::new(ROUTES_CSV), &network)?;
    for node in network.nodes() {
        info!(node = network.label(node), degree = network.out_degree(node), "stop");
    }

    // 2. Simulation.
    let horizon = SimTime::from_secs(config.horizon_secs);
    let mut sim = SimBuilder::new(config)
        .network(network)
        .profiles(profiles)
        .distributions(distributions)
        .route_matrix(matrix)
        .build()?;
    sim.initialize()?;

    // 3. Run.
    let started = Instant::now();
    let mut trace = EventTrace::new();
    let events = sim.run_to_horizon_with(&mut trace);
    let elapsed = started.elapsed();

    let stats = sim.statistics();
    info!(
        events,
        traced = trace.len(),
        spawns = trace.spawns,
        elapsed_ms = elapsed.as_millis() as u64,
        horizon = %horizon,
        state = %sim.state(),
        "run finished"
    );
    info!(
        hits = stats.cache_hits,
        misses = stats.cache_misses,
        evictions = stats.cache_evictions,
        "route cache"
    );
    if let Some(profiles) = sim.profiles() {
        for (profile, share) in profiles.iter().zip(stats.profile_shares()) {
            info!(profile = %profile.name, share, configured = profile.probability, "profile split");
        }
    }
    for view in sim.active_cyclists().iter().take(5) {
        info!(
            cyclist = %view.id,
            x = view.position.x,
            y = view.position.y,
            velocity = view.velocity_mps,
            state = %view.state,
            "still riding"
        );
    }
    info!("{}", summarize(&stats));
    Ok(())
}
