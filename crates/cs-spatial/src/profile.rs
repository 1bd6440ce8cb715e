//! Rider preference profiles.
//!
//! A profile weights the four edge attributes.  Weights are free-form
//! non-negative scalars; they need not sum to one.  For a given edge the
//! profile yields:
//!
//! - a **score** `Σ w[a] · normalize(a)`, where each term lies in
//!   `[0, w[a]]` (see [`crate::attribute`] for the normalization), and
//! - a routing **cost** `Σ w[a] · (1 - normalize(a))`, the shortfall from a
//!   perfect edge, which Dijkstra minimizes.  High-scoring edges are cheap.
//!
//! A tiny per-hop constant keeps every cost strictly positive so that among
//! equally scored paths the one with fewer hops wins.

use cs_core::ProfileId;
use tracing::warn;

use crate::attribute::{AttributeRanges, EdgeAttribute, EdgeAttributes};
use crate::{SpatialError, SpatialResult};

/// Added to every edge cost.
pub const HOP_COST: f64 = 1e-6;

// ── ProfileWeights ────────────────────────────────────────────────────────────

/// Attribute → weight map, stored densely.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ProfileWeights([f64; EdgeAttribute::COUNT]);

impl ProfileWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.  See [`set`](Self::set) for clamping.
    pub fn with(mut self, attr: EdgeAttribute, weight: f64) -> Self {
        self.set(attr, weight);
        self
    }

    /// Set one weight.  Negative or non-finite weights would make Dijkstra
    /// costs negative, so they are stored as `0.0` with a warning.
    pub fn set(&mut self, attr: EdgeAttribute, weight: f64) {
        let w = if weight.is_finite() && weight >= 0.0 {
            weight
        } else {
            warn!(attribute = %attr, weight, "invalid profile weight replaced by 0");
            0.0
        };
        self.0[attr.index()] = w;
    }

    #[inline]
    pub fn get(&self, attr: EdgeAttribute) -> f64 {
        self.0[attr.index()]
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Non-zero `(attribute, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (EdgeAttribute, f64)> + '_ {
        EdgeAttribute::ALL
            .into_iter()
            .map(|a| (a, self.0[a.index()]))
            .filter(|&(_, w)| w > 0.0)
    }
}

// ── Profile ───────────────────────────────────────────────────────────────────

/// One rider preference profile.  Shared read-only by every cyclist that
/// uses it.
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    /// Selection probability as configured (normalized by the generator).
    pub probability: f64,
    pub weights: ProfileWeights,
}

impl Profile {
    pub fn new(id: ProfileId, name: impl Into<String>, probability: f64, weights: ProfileWeights) -> Self {
        Self { id, name: name.into(), probability, weights }
    }

    /// Weighted contribution of one attribute value, in `[0, w[attr]]`.
    #[inline]
    pub fn contribution(&self, attr: EdgeAttribute, value: f64, ranges: &AttributeRanges) -> f64 {
        self.weights.get(attr) * ranges.normalize(attr, value)
    }

    /// Desirability score of an edge, in `[0, weights.total()]`.
    pub fn score(&self, attrs: &EdgeAttributes, ranges: &AttributeRanges) -> f64 {
        self.weights
            .iter()
            .map(|(a, _)| self.contribution(a, attrs.get(a), ranges))
            .sum()
    }

    /// Dijkstra cost of an edge for this profile.
    pub fn edge_cost(&self, attrs: &EdgeAttributes, ranges: &AttributeRanges) -> f64 {
        let shortfall: f64 = self
            .weights
            .iter()
            .map(|(a, w)| w - self.contribution(a, attrs.get(a), ranges))
            .sum();
        shortfall.max(0.0) + HOP_COST
    }
}

// ── ProfileSet ────────────────────────────────────────────────────────────────

/// The scenario's profile table, indexed by `ProfileId`.
#[derive(Clone, Debug, Default)]
pub struct ProfileSet {
    profiles: Vec<Profile>,
}

impl ProfileSet {
    /// Ids are reassigned to match table position.
    pub fn new(profiles: Vec<Profile>) -> SpatialResult<Self> {
        if profiles.is_empty() {
            return Err(SpatialError::EmptyProfiles);
        }
        if profiles.len() > u16::MAX as usize {
            return Err(SpatialError::Parse(format!("too many profiles: {}", profiles.len())));
        }
        let profiles = profiles
            .into_iter()
            .enumerate()
            .map(|(i, mut p)| {
                p.id = ProfileId(i as u16);
                p
            })
            .collect();
        Ok(Self { profiles })
    }

    pub fn get(&self, id: ProfileId) -> Option<&Profile> {
        self.profiles.get(id.index())
    }

    pub fn by_name(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Configured probabilities in table order (not normalized).
    pub fn probabilities(&self) -> Vec<f64> {
        self.profiles.iter().map(|p| p.probability).collect()
    }
}
