//! Edge attributes and their load-time range table.
//!
//! # Normalization convention
//!
//! Every attribute is mapped to a *desirability* in `[0, 1]` using the
//! `(min, max)` range recorded when the network was built:
//!
//! | Attribute    | Raw semantics     | Normalized value              |
//! |--------------|-------------------|-------------------------------|
//! | `distance`   | higher is worse   | `(max - v) / (max - min)`     |
//! | `slope`      | higher is worse   | `(max - v) / (max - min)`     |
//! | `safety`     | higher is better  | `(v - min) / (max - min)`     |
//! | `luminosity` | higher is better  | `(v - min) / (max - min)`     |
//!
//! The inversion for `distance`/`slope` is load-bearing: flipping it makes
//! every profile prefer long climbs and dark streets without any visible
//! failure.  A degenerate range (`max == min`) normalizes to `0.0`.

use std::fmt;
use std::str::FromStr;

use crate::SpatialError;

/// Range widths below this are treated as a single value.
const RANGE_EPSILON: f64 = 1e-12;

// ── EdgeAttribute ─────────────────────────────────────────────────────────────

/// A routable edge attribute that a profile can weight.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum EdgeAttribute {
    /// Edge length in metres.
    Distance,
    /// Perceived safety, 0–10.
    Safety,
    /// Street lighting, 0–10.
    Luminosity,
    /// Signed grade in percent along the direction of travel.
    Slope,
}

impl EdgeAttribute {
    pub const COUNT: usize = 4;

    pub const ALL: [EdgeAttribute; Self::COUNT] = [
        EdgeAttribute::Distance,
        EdgeAttribute::Safety,
        EdgeAttribute::Luminosity,
        EdgeAttribute::Slope,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// `true` for attributes whose larger raw values are less desirable.
    #[inline]
    pub fn higher_is_worse(self) -> bool {
        matches!(self, EdgeAttribute::Distance | EdgeAttribute::Slope)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EdgeAttribute::Distance   => "distance",
            EdgeAttribute::Safety     => "safety",
            EdgeAttribute::Luminosity => "luminosity",
            EdgeAttribute::Slope      => "slope",
        }
    }
}

impl fmt::Display for EdgeAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeAttribute {
    type Err = SpatialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance"   => Ok(EdgeAttribute::Distance),
            "safety"     => Ok(EdgeAttribute::Safety),
            "luminosity" => Ok(EdgeAttribute::Luminosity),
            "slope"      => Ok(EdgeAttribute::Slope),
            other => Err(SpatialError::Parse(format!(
                "unknown edge attribute {other:?}: expected distance, safety, luminosity or slope"
            ))),
        }
    }
}

// ── EdgeAttributes ────────────────────────────────────────────────────────────

/// Attribute values of one directed edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeAttributes {
    pub distance_m: f64,
    pub safety:     f64,
    pub luminosity: f64,
    pub slope_pct:  f64,
}

impl EdgeAttributes {
    /// Flat, average-quality edge of the given length.
    pub fn with_distance(distance_m: f64) -> Self {
        Self { distance_m, safety: 5.0, luminosity: 5.0, slope_pct: 0.0 }
    }

    #[inline]
    pub fn get(&self, attr: EdgeAttribute) -> f64 {
        match attr {
            EdgeAttribute::Distance   => self.distance_m,
            EdgeAttribute::Safety     => self.safety,
            EdgeAttribute::Luminosity => self.luminosity,
            EdgeAttribute::Slope      => self.slope_pct,
        }
    }

    /// The same road seen from the other end: uphill becomes downhill.
    #[inline]
    pub fn reversed(self) -> Self {
        Self { slope_pct: -self.slope_pct, ..self }
    }
}

// ── Ranges ────────────────────────────────────────────────────────────────────

/// Observed `(min, max)` of one attribute.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AttributeRange {
    pub min: f64,
    pub max: f64,
}

impl AttributeRange {
    /// An empty range that any `include` call will replace.
    pub const EMPTY: AttributeRange = AttributeRange { min: f64::INFINITY, max: f64::NEG_INFINITY };

    pub fn include(&mut self, v: f64) {
        if v.is_finite() {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Map `value` to a desirability in `[0, 1]` (see module docs).
    pub fn normalize(&self, attr: EdgeAttribute, value: f64) -> f64 {
        let span = self.max - self.min;
        if self.is_empty() || !value.is_finite() || span <= RANGE_EPSILON {
            return 0.0;
        }
        let v = value.clamp(self.min, self.max);
        let direct = (v - self.min) / span;
        if attr.higher_is_worse() { 1.0 - direct } else { direct }
    }
}

/// Per-attribute ranges computed once at network build time (one O(E)
/// scan) and shared by every profile's weighted view.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeRanges([AttributeRange; EdgeAttribute::COUNT]);

impl AttributeRanges {
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'a EdgeAttributes>,
    {
        let mut ranges = [AttributeRange::EMPTY; EdgeAttribute::COUNT];
        for e in edges {
            for attr in EdgeAttribute::ALL {
                ranges[attr.index()].include(e.get(attr));
            }
        }
        AttributeRanges(ranges)
    }

    #[inline]
    pub fn get(&self, attr: EdgeAttribute) -> AttributeRange {
        self.0[attr.index()]
    }

    #[inline]
    pub fn normalize(&self, attr: EdgeAttribute, value: f64) -> f64 {
        self.0[attr.index()].normalize(attr, value)
    }
}
