//! CSV loaders for the scenario tables.
//!
//! # Profile table
//!
//! `profile` and `probability` are required; every other column names an
//! edge attribute and holds that profile's weight (empty = 0).
//!
//! ```csv
//! profile,probability,distance,safety,luminosity,slope
//! commuter,0.7,1.0,0.2,,0.5
//! leisure,0.3,0.1,1.0,0.8,1.0
//! ```
//!
//! # Route matrix
//!
//! ```csv
//! origin,destination,probability
//! A,B,0.6
//! A,C,0.4
//! ```
//!
//! # Distribution table
//!
//! ```csv
//! node,kind,p1,p2
//! A,exponential,0.5,
//! B,gamma,2.0,3.0
//! ```
//!
//! Nodes are referenced by label.  Parameters are returned unvalidated as
//! [`DistributionSpec`]s; validation happens when they are built.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use cs_core::{NodeId, ProfileId};
use cs_spatial::{EdgeAttribute, Profile, ProfileSet, ProfileWeights, RoadNetwork, SpatialError};

use crate::distribution::DistributionSpec;
use crate::matrix::RouteMatrix;
use crate::{ArrivalError, ArrivalResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RouteRecord {
    origin:      String,
    destination: String,
    probability: f64,
}

#[derive(Deserialize)]
struct DistributionRecord {
    node: String,
    kind: String,
    p1:   f64,
    #[serde(default)]
    p2:   Option<f64>,
}

// ── Profiles ──────────────────────────────────────────────────────────────────

pub fn load_profiles_csv(path: &Path) -> ArrivalResult<ProfileSet> {
    load_profiles_reader(std::fs::File::open(path)?)
}

pub fn load_profiles_reader<R: Read>(reader: R) -> ArrivalResult<ProfileSet> {
    let mut reader = csv_reader(reader);
    let headers = reader.headers().map_err(parse_err)?.clone();

    let mut name_col = None;
    let mut prob_col = None;
    let mut attr_cols = Vec::new();
    for (i, h) in headers.iter().enumerate() {
        match h {
            "profile"     => name_col = Some(i),
            "probability" => prob_col = Some(i),
            other         => attr_cols.push((i, other.parse::<EdgeAttribute>()?)),
        }
    }
    let (Some(name_col), Some(prob_col)) = (name_col, prob_col) else {
        return Err(ArrivalError::Parse("profile table needs `profile` and `probability` columns".into()));
    };

    let mut profiles = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(parse_err)?;
        let name = record.get(name_col).unwrap_or_default().to_owned();
        let probability = parse_number(record.get(prob_col), row, "probability")?.unwrap_or(0.0);

        let mut weights = ProfileWeights::new();
        for &(col, attr) in &attr_cols {
            if let Some(w) = parse_number(record.get(col), row, attr.as_str())? {
                weights.set(attr, w);
            }
        }
        profiles.push(Profile::new(ProfileId(0), name, probability, weights));
    }
    Ok(ProfileSet::new(profiles)?)
}

// ── Route matrix ──────────────────────────────────────────────────────────────

pub fn load_route_matrix_csv(path: &Path, network: &RoadNetwork) -> ArrivalResult<RouteMatrix> {
    load_route_matrix_reader(std::fs::File::open(path)?, network)
}

pub fn load_route_matrix_reader<R: Read>(reader: R, network: &RoadNetwork) -> ArrivalResult<RouteMatrix> {
    let mut rows = Vec::new();
    for result in csv_reader(reader).deserialize::<RouteRecord>() {
        let r = result.map_err(parse_err)?;
        rows.push((node(network, &r.origin)?, node(network, &r.destination)?, r.probability));
    }
    RouteMatrix::from_rows(rows)
}

// ── Distributions ─────────────────────────────────────────────────────────────

pub fn load_distributions_csv(path: &Path, network: &RoadNetwork) -> ArrivalResult<Vec<(NodeId, DistributionSpec)>> {
    load_distributions_reader(std::fs::File::open(path)?, network)
}

pub fn load_distributions_reader<R: Read>(
    reader:  R,
    network: &RoadNetwork,
) -> ArrivalResult<Vec<(NodeId, DistributionSpec)>> {
    let mut specs = Vec::new();
    for result in csv_reader(reader).deserialize::<DistributionRecord>() {
        let r = result.map_err(parse_err)?;
        let params = std::iter::once(r.p1).chain(r.p2).collect();
        specs.push((node(network, &r.node)?, DistributionSpec::new(r.kind, params)));
    }
    Ok(specs)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader)
}

fn parse_err(e: csv::Error) -> ArrivalError {
    ArrivalError::Parse(e.to_string())
}

fn node(network: &RoadNetwork, label: &str) -> ArrivalResult<NodeId> {
    network
        .node_by_label(label)
        .ok_or_else(|| SpatialError::UnknownNode(label.to_owned()).into())
}

fn parse_number(cell: Option<&str>, row: usize, column: &str) -> ArrivalResult<Option<f64>> {
    match cell.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ArrivalError::Parse(format!("row {}: {column} {s:?} is not a number", row + 1))),
    }
}
