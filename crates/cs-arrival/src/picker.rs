//! Probability-weighted selection over a fixed item list.

use rand::distributions::{Distribution, WeightedIndex};
use tracing::warn;

use cs_core::SimRng;

use crate::{ArrivalError, ArrivalResult};

/// Configured probabilities may miss 1.0 by this much before a warning.
pub const PROBABILITY_TOLERANCE: f64 = 0.01;

/// Picks items with probability proportional to their weight.
///
/// Negative or non-finite weights count as zero.  Weights are used as
/// relative, so a table that does not sum to one is normalized implicitly;
/// [`from_probabilities`](Self::from_probabilities) additionally warns when
/// the sum is off by more than [`PROBABILITY_TOLERANCE`].
#[derive(Clone, Debug)]
pub struct WeightedPicker<T> {
    items:   Vec<T>,
    weights: Vec<f64>,
    index:   WeightedIndex<f64>,
}

impl<T> WeightedPicker<T> {
    /// `context` names the table in errors and logs.
    pub fn new(entries: Vec<(T, f64)>, context: &str) -> ArrivalResult<Self> {
        let (items, weights): (Vec<T>, Vec<f64>) = entries
            .into_iter()
            .map(|(item, w)| (item, if w.is_finite() && w > 0.0 { w } else { 0.0 }))
            .unzip();
        let index = WeightedIndex::new(&weights)
            .map_err(|_| ArrivalError::NoPositiveWeight(context.to_owned()))?;
        Ok(Self { items, weights, index })
    }

    /// Like [`new`](Self::new), for tables meant to sum to one.
    pub fn from_probabilities(entries: Vec<(T, f64)>, context: &str) -> ArrivalResult<Self> {
        let picker = Self::new(entries, context)?;
        let sum = picker.total_weight();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            warn!(table = context, sum, "probabilities do not sum to 1, normalizing");
        }
        Ok(picker)
    }

    pub fn pick(&self, rng: &mut SimRng) -> &T {
        &self.items[self.index.sample(rng.inner())]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// `(item, normalized probability)` pairs in table order.
    pub fn probabilities(&self) -> impl Iterator<Item = (&T, f64)> + '_ {
        let total = self.total_weight();
        self.items.iter().zip(&self.weights).map(move |(item, w)| (item, w / total))
    }
}
