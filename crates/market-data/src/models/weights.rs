use std::collections::HashMap;

/// Market capitalization per canonical id, used only for ranking.
///
/// Missing, null and negative values read as 0.
#[derive(Clone, Debug, Default)]
pub struct MarketWeights {
    values: HashMap<String, f64>,
}

impl MarketWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a weight. `None` (JSON null) is stored as 0.
    pub fn insert(&mut self, canonical_id: impl Into<String>, weight: Option<f64>) {
        let weight = weight.filter(|w| w.is_finite() && *w > 0.0).unwrap_or(0.0);
        self.values.insert(canonical_id.into(), weight);
    }

    /// Merge another batch of weights into this one.
    pub fn extend(&mut self, other: MarketWeights) {
        self.values.extend(other.values);
    }

    pub fn get(&self, canonical_id: &str) -> f64 {
        self.values.get(canonical_id).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, f64)> for MarketWeights {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut weights = MarketWeights::new();
        for (id, weight) in iter {
            weights.insert(id, Some(weight));
        }
        weights
    }
}
