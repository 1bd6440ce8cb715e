//! Origin → destination probability table.

use std::collections::BTreeMap;

use tracing::warn;

use cs_core::{NodeId, SimRng};

use crate::picker::WeightedPicker;
use crate::ArrivalResult;

/// Per-origin destination probabilities.  Origins without a row fall back to
/// a uniform choice, made by the generator.
#[derive(Clone, Debug, Default)]
pub struct RouteMatrix {
    rows: BTreeMap<NodeId, WeightedPicker<NodeId>>,
}

impl RouteMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(origin, destination, probability)` triples.  Self-loops
    /// are skipped with a warning; each row is normalized independently.
    pub fn from_rows<I>(rows: I) -> ArrivalResult<Self>
    where
        I: IntoIterator<Item = (NodeId, NodeId, f64)>,
    {
        let mut grouped: BTreeMap<NodeId, Vec<(NodeId, f64)>> = BTreeMap::new();
        for (origin, destination, p) in rows {
            if origin == destination {
                warn!(%origin, "route matrix self-loop ignored");
                continue;
            }
            grouped.entry(origin).or_default().push((destination, p));
        }

        let mut matrix = RouteMatrix::new();
        for (origin, entries) in grouped {
            let picker = WeightedPicker::from_probabilities(entries, &format!("route row {origin}"))?;
            matrix.rows.insert(origin, picker);
        }
        Ok(matrix)
    }

    pub fn has_row(&self, origin: NodeId) -> bool {
        self.rows.contains_key(&origin)
    }

    /// Draw a destination from `origin`'s row, if it has one.
    pub fn pick(&self, origin: NodeId, rng: &mut SimRng) -> Option<NodeId> {
        self.rows.get(&origin).map(|row| *row.pick(rng))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every node referenced by the table.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.rows
            .iter()
            .flat_map(|(&o, row)| std::iter::once(o).chain(row.probabilities().map(|(&d, _)| d)))
    }
}
