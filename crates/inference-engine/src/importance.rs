//! Feature importance ranking

use crate::InferenceError;
use feature_engine::{FeatureSchema, FEATURE_DIMENSION};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Importance score per model input slot, exported next to the model
#[derive(Debug, Clone)]
pub struct FeatureImportance {
    scores: Vec<f64>,
}

/// One entry of an importance ranking
#[derive(Debug, Clone, Serialize)]
pub struct RankedFeature {
    /// 1-based rank
    pub rank: usize,
    /// Slot name from the feature schema
    pub name: String,
    /// Raw importance score
    pub score: f64,
    /// Share of the total importance, percent rounded to 2 decimals
    pub percent: f64,
}

impl FeatureImportance {
    /// Wrap scores, which must cover every model input slot
    pub fn new(scores: Vec<f64>) -> Result<Self, InferenceError> {
        if scores.len() != FEATURE_DIMENSION {
            return Err(InferenceError::InvalidImportance(format!(
                "expected {} scores, got {}",
                FEATURE_DIMENSION,
                scores.len()
            )));
        }
        if scores.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(InferenceError::InvalidImportance(
                "scores must be finite and non-negative".to_string(),
            ));
        }
        Ok(Self { scores })
    }

    /// Load a JSON array of scores
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| InferenceError::InvalidImportance(format!("{}: {}", path.display(), e)))?;
        let scores: Vec<f64> =
            serde_json::from_str(&text).map_err(|e| InferenceError::InvalidImportance(e.to_string()))?;

        info!("Loaded feature importance table from {}", path.display());
        Self::new(scores)
    }

    /// Raw scores in slot order
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// The `top_n` most important slots, highest first
    pub fn ranked(&self, schema: &FeatureSchema, top_n: usize) -> Vec<RankedFeature> {
        let total: f64 = self.scores.iter().sum();

        let mut order: Vec<usize> = (0..self.scores.len()).collect();
        order.sort_by(|&a, &b| self.scores[b].total_cmp(&self.scores[a]));

        order
            .into_iter()
            .take(top_n)
            .enumerate()
            .map(|(i, slot)| {
                let score = self.scores[slot];
                let percent = if total > 0.0 {
                    (score / total * 10_000.0).round() / 100.0
                } else {
                    0.0
                };
                RankedFeature {
                    rank: i + 1,
                    name: schema
                        .name(slot)
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("feature_{}", slot)),
                    score,
                    percent,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn importance() -> FeatureImportance {
        let mut scores = vec![0.01; FEATURE_DIMENSION];
        scores[1] = 0.30; // model_year
        scores[0] = 0.20; // mileage_km
        scores[3] = 0.15; // engine_power_hp
        FeatureImportance::new(scores).unwrap()
    }

    #[test]
    fn test_ranking_order() {
        let schema = FeatureSchema::new(&["Beyaz"]);
        let ranked = importance().ranked(&schema, 3);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].name, "model_year");
        assert_eq!(ranked[1].name, "mileage_km");
        assert_eq!(ranked[2].name, "engine_power_hp");
        assert_eq!(ranked[0].rank, 1);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let schema = FeatureSchema::new::<&str>(&[]);
        let ranked = importance().ranked(&schema, FEATURE_DIMENSION);
        let total: f64 = ranked.iter().map(|r| r.percent).sum();
        assert!((total - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(matches!(
            FeatureImportance::new(vec![1.0; 12]),
            Err(InferenceError::InvalidImportance(_))
        ));
    }

    #[test]
    fn test_negative_rejected() {
        let mut scores = vec![0.0; FEATURE_DIMENSION];
        scores[4] = -1.0;
        assert!(FeatureImportance::new(scores).is_err());
    }

    proptest! {
        #[test]
        fn prop_ranking_descending(scores in proptest::collection::vec(0.0f64..1.0, FEATURE_DIMENSION), top in 0usize..60) {
            let schema = FeatureSchema::new(&["Beyaz", "Siyah"]);
            let ranked = FeatureImportance::new(scores).unwrap().ranked(&schema, top);

            prop_assert_eq!(ranked.len(), top.min(FEATURE_DIMENSION));
            prop_assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
            prop_assert!(ranked.iter().enumerate().all(|(i, r)| r.rank == i + 1));
        }
    }
}
