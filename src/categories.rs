use serde::{Deserialize, Serialize};

use crate::error::{Result, SamplingError};
use crate::stream::SeededRandomStream;

/// Categories to spread selections over: a count of equally weighted
/// categories, or an explicit weight per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryWeights {
    Count(usize),
    Weights(Vec<f64>),
}

impl CategoryWeights {
    fn into_weights(self) -> Vec<f64> {
        match self {
            CategoryWeights::Count(n) => vec![1.0; n],
            CategoryWeights::Weights(w) => w,
        }
    }
}

impl From<usize> for CategoryWeights {
    fn from(n: usize) -> Self {
        CategoryWeights::Count(n)
    }
}

impl From<Vec<f64>> for CategoryWeights {
    fn from(weights: Vec<f64>) -> Self {
        CategoryWeights::Weights(weights)
    }
}

impl From<&[f64]> for CategoryWeights {
    fn from(weights: &[f64]) -> Self {
        CategoryWeights::Weights(weights.to_vec())
    }
}

// Accumulates back to front; floor/remainder splits depend on the order.
fn backward_sum(values: &[f64]) -> f64 {
    values.iter().rev().fold(0.0, |acc, v| acc + v)
}

impl SeededRandomStream {
    /// Spread `total` selections over the categories as evenly as the weights allow.
    ///
    /// Each category first receives the floor of its proportional share. The
    /// selections left over go to distinct categories picked at random, weighted
    /// by the fractional part each category lost to the floor.
    pub fn allocate_category_counts(
        &mut self,
        total: usize,
        categories: impl Into<CategoryWeights>,
    ) -> Result<Vec<usize>> {
        let weights = categories.into().into_weights();
        if weights.is_empty() {
            return Err(SamplingError::InvalidWeights("no categories given".into()));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(SamplingError::InvalidWeights(format!(
                "category weight {w} is not a finite non-negative number"
            )));
        }
        let total_weight = backward_sum(&weights);
        if total_weight <= 0.0 {
            return Err(SamplingError::InvalidWeights("category weights sum to zero".into()));
        }

        let scale = total as f64 / total_weight;
        let ideals: Vec<f64> = weights.iter().map(|w| w * scale).collect();
        if !total_weight.is_finite() || !scale.is_finite() || ideals.iter().any(|x| !x.is_finite()) {
            return Err(SamplingError::InvalidWeights(format!(
                "category weights out of range (total {total_weight}, scale {scale})"
            )));
        }
        let floors: Vec<f64> = ideals.iter().map(|x| x.floor()).collect();
        let remainders: Vec<f64> = ideals.iter().zip(&floors).map(|(x, f)| x - f).collect();

        let extra = (total as f64 - backward_sum(&floors)).max(0.0) as usize;
        let indices: Vec<usize> = (0..weights.len()).collect();
        let extras = self.draw_without_replacement(extra, &indices, Some(&remainders));

        let mut counts: Vec<usize> = floors.iter().map(|&f| f as usize).collect();
        for i in extras {
            counts[i] += 1;
        }
        Ok(counts)
    }
}
