//! CSV road-network loader.
//!
//! # CSV format
//!
//! Two tables.  Nodes, one row per node; every coordinate column is
//! optional and may be left empty or omitted from the header:
//!
//! ```csv
//! node,x,y,lat,lon
//! A,0,0,,
//! B,850,0,,
//! ```
//!
//! Roads, one row per undirected road, endpoints referenced by label:
//!
//! ```csv
//! origin,destination,distance,safety,luminosity,slope
//! A,B,850,7,6,2.5
//! ```
//!
//! | Column       | Default | Notes                                           |
//! |--------------|---------|-------------------------------------------------|
//! | `distance`   | none    | metres; ignored when both endpoints have lat/lon |
//! | `safety`     | 5       | must lie in `0..=10`                            |
//! | `luminosity` | 5       | must lie in `0..=10`                            |
//! | `slope`      | 0       | percent, from `origin` towards `destination`    |
//!
//! The loader only parses.  Callers run [`RoadNetwork::validate`] before
//! simulating on the result.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use cs_core::{GeoPoint, NodeId, Point2};

use crate::attribute::EdgeAttributes;
use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::{SpatialError, SpatialResult};

const SCALE_MAX: f64 = 10.0;

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    node: String,
    #[serde(default)]
    x:    Option<f64>,
    #[serde(default)]
    y:    Option<f64>,
    #[serde(default)]
    lat:  Option<f64>,
    #[serde(default)]
    lon:  Option<f64>,
}

#[derive(Deserialize)]
struct RoadRecord {
    origin:      String,
    destination: String,
    #[serde(default)]
    distance:    Option<f64>,
    #[serde(default)]
    safety:      Option<f64>,
    #[serde(default)]
    luminosity:  Option<f64>,
    #[serde(default)]
    slope:       Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a network from a node CSV and a road CSV on disk.
pub fn load_network_csv(nodes: &Path, roads: &Path, layout_seed: u64) -> SpatialResult<RoadNetwork> {
    let nodes = std::fs::File::open(nodes)?;
    let roads = std::fs::File::open(roads)?;
    load_network_reader(nodes, roads, layout_seed)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
pub fn load_network_reader<N: Read, E: Read>(
    nodes:       N,
    roads:       E,
    layout_seed: u64,
) -> SpatialResult<RoadNetwork> {
    let mut builder = RoadNetworkBuilder::new().layout_seed(layout_seed);
    let mut by_label: FxHashMap<String, (NodeId, bool)> = FxHashMap::default();

    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut reader = csv_reader(nodes);
    for (row, result) in reader.deserialize::<NodeRecord>().enumerate() {
        let r = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        let label = r.node.trim().to_owned();
        if label.is_empty() {
            return Err(SpatialError::Parse(format!("node row {}: empty label", row + 1)));
        }
        if by_label.contains_key(&label) {
            return Err(SpatialError::Parse(format!("duplicate node label {label:?}")));
        }
        let (id, has_geo) = match (r.lat, r.lon, r.x, r.y) {
            (Some(lat), Some(lon), ..) => (builder.add_geo_node(label.clone(), GeoPoint::new(lat, lon)), true),
            (_, _, Some(x), Some(y))   => (builder.add_node_at(label.clone(), Point2::new(x, y)), false),
            _                          => (builder.add_node(label.clone()), false),
        };
        by_label.insert(label, (id, has_geo));
    }

    // ── Roads ─────────────────────────────────────────────────────────────
    let mut reader = csv_reader(roads);
    for result in reader.deserialize::<RoadRecord>() {
        let r = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        let (a, a_geo) = lookup(&by_label, &r.origin)?;
        let (b, b_geo) = lookup(&by_label, &r.destination)?;

        let distance_m = match r.distance {
            Some(d) => d,
            None if a_geo && b_geo => 0.0, // replaced by the haversine length at build
            None => {
                return Err(SpatialError::Parse(format!(
                    "road {} -> {}: missing distance and no coordinates to derive it",
                    r.origin, r.destination
                )));
            }
        };
        let attrs = EdgeAttributes {
            distance_m,
            safety:     scaled(r.safety, "safety", &r)?,
            luminosity: scaled(r.luminosity, "luminosity", &r)?,
            slope_pct:  r.slope.unwrap_or(0.0),
        };
        builder.add_road(a, b, attrs);
    }

    Ok(builder.build())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader)
}

fn lookup(by_label: &FxHashMap<String, (NodeId, bool)>, label: &str) -> SpatialResult<(NodeId, bool)> {
    by_label
        .get(label.trim())
        .copied()
        .ok_or_else(|| SpatialError::UnknownNode(label.to_owned()))
}

fn scaled(value: Option<f64>, column: &str, r: &RoadRecord) -> SpatialResult<f64> {
    let v = value.unwrap_or(SCALE_MAX / 2.0);
    if !(0.0..=SCALE_MAX).contains(&v) {
        return Err(SpatialError::Parse(format!(
            "road {} -> {}: {column} {v} outside 0..={SCALE_MAX}",
            r.origin, r.destination
        )));
    }
    Ok(v)
}
