//! Regression model evaluation.
//!
//! The model artifact predicts a *transformed-scale* price (Box–Cox space);
//! the pipeline owns the inverse transform. Two formats are supported behind
//! the same `predict` contract:
//!
//! - `linear`: intercept + one coefficient per feature
//! - `oblivious_trees`: a sum of symmetric decision trees, the structure
//!   gradient-boosting toolkits export — every level of a tree tests one
//!   (feature, threshold) pair, so a depth-d tree is evaluated as a d-bit
//!   index into its 2^d leaf values
//!
//! Evaluation is pure and deterministic. Shape problems (coefficient count,
//! leaf count, feature index) surface as `Inference` errors rather than
//! panics, since they indicate a corrupt or mismatched artifact.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// A trained regression model, tagged by format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegressionModel {
    Linear(LinearModel),
    ObliviousTrees(ObliviousTreesModel),
}

/// `score = intercept + coefficients · x`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

/// `score = base_score + Σ_trees leaf(tree, x)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObliviousTreesModel {
    pub base_score: f64,
    pub trees: Vec<ObliviousTree>,
}

/// One symmetric tree: level i tests `x[features[i]] > thresholds[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObliviousTree {
    pub features: Vec<usize>,
    pub thresholds: Vec<f64>,
    pub leaf_values: Vec<f64>,
}

impl RegressionModel {
    /// Evaluate the model on an encoded feature vector.
    pub fn predict(&self, x: &[f64]) -> Result<f64, PricingError> {
        match self {
            RegressionModel::Linear(m) => m.predict(x),
            RegressionModel::ObliviousTrees(m) => m.predict(x),
        }
    }

    /// Short human-readable description for reports.
    pub fn describe(&self) -> String {
        match self {
            RegressionModel::Linear(m) => {
                format!("linear ({} coefficients)", m.coefficients.len())
            }
            RegressionModel::ObliviousTrees(m) => {
                let depth = m.trees.first().map(|t| t.features.len()).unwrap_or(0);
                format!("oblivious trees ({} trees, depth {depth})", m.trees.len())
            }
        }
    }
}

impl LinearModel {
    fn predict(&self, x: &[f64]) -> Result<f64, PricingError> {
        if self.coefficients.len() != x.len() {
            return Err(PricingError::Inference(format!(
                "linear model expects {} features, got {}",
                self.coefficients.len(),
                x.len()
            )));
        }

        let coefficients = DVector::from_column_slice(&self.coefficients);
        let features = DVector::from_column_slice(x);
        Ok(self.intercept + coefficients.dot(&features))
    }
}

impl ObliviousTreesModel {
    fn predict(&self, x: &[f64]) -> Result<f64, PricingError> {
        let mut score = self.base_score;
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            score += tree.evaluate(x).map_err(|msg| {
                PricingError::Inference(format!("tree {tree_idx}: {msg}"))
            })?;
        }
        Ok(score)
    }
}

impl ObliviousTree {
    fn evaluate(&self, x: &[f64]) -> Result<f64, String> {
        let depth = self.features.len();
        if self.thresholds.len() != depth {
            return Err(format!(
                "{} features but {} thresholds",
                depth,
                self.thresholds.len()
            ));
        }
        if self.leaf_values.len() != (1 << depth) {
            return Err(format!(
                "depth {depth} requires {} leaves, got {}",
                1 << depth,
                self.leaf_values.len()
            ));
        }

        let mut leaf = 0usize;
        for (level, (&feature, &threshold)) in
            self.features.iter().zip(&self.thresholds).enumerate()
        {
            let value = *x
                .get(feature)
                .ok_or_else(|| format!("feature index {feature} out of range"))?;
            if value > threshold {
                leaf |= 1 << level;
            }
        }

        Ok(self.leaf_values[leaf])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_model_is_a_dot_product() {
        let model = RegressionModel::Linear(LinearModel {
            intercept: 1.0,
            coefficients: vec![2.0, 0.5, -1.0],
        });
        let score = model.predict(&[1.0, 4.0, 3.0]).unwrap();
        assert!((score - (1.0 + 2.0 + 2.0 - 3.0)).abs() < 1e-12);
    }

    #[test]
    fn linear_model_rejects_wrong_dimension() {
        let model = RegressionModel::Linear(LinearModel {
            intercept: 0.0,
            coefficients: vec![1.0, 2.0],
        });
        let err = model.predict(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, PricingError::Inference(_)));
    }

    #[test]
    fn oblivious_tree_indexes_leaves_by_split_bits() {
        // Level 0: x[0] > 0.0, level 1: x[2] > 2.0.
        let tree = ObliviousTree {
            features: vec![0, 2],
            thresholds: vec![0.0, 2.0],
            leaf_values: vec![10.0, 11.0, 12.0, 13.0],
        };
        // Both splits false -> leaf 0.
        assert_eq!(tree.evaluate(&[-1.0, 0.0, 1.0]).unwrap(), 10.0);
        // First split true only -> leaf 1.
        assert_eq!(tree.evaluate(&[1.0, 0.0, 1.0]).unwrap(), 11.0);
        // Second split true only -> leaf 2.
        assert_eq!(tree.evaluate(&[-1.0, 0.0, 3.0]).unwrap(), 12.0);
        // Both true -> leaf 3.
        assert_eq!(tree.evaluate(&[1.0, 0.0, 3.0]).unwrap(), 13.0);
    }

    #[test]
    fn tree_ensemble_sums_over_trees_and_base_score() {
        let model = RegressionModel::ObliviousTrees(ObliviousTreesModel {
            base_score: 5.0,
            trees: vec![
                ObliviousTree {
                    features: vec![0],
                    thresholds: vec![0.5],
                    leaf_values: vec![-1.0, 1.0],
                },
                ObliviousTree {
                    features: vec![1],
                    thresholds: vec![0.5],
                    leaf_values: vec![-2.0, 2.0],
                },
            ],
        });
        let score = model.predict(&[1.0, 0.0]).unwrap();
        assert!((score - (5.0 + 1.0 - 2.0)).abs() < 1e-12);
    }

    #[test]
    fn malformed_tree_shapes_are_inference_errors() {
        let bad_leaves = RegressionModel::ObliviousTrees(ObliviousTreesModel {
            base_score: 0.0,
            trees: vec![ObliviousTree {
                features: vec![0, 1],
                thresholds: vec![0.0, 0.0],
                leaf_values: vec![1.0, 2.0], // needs 4
            }],
        });
        assert!(matches!(
            bad_leaves.predict(&[0.0, 0.0]).unwrap_err(),
            PricingError::Inference(_)
        ));

        let bad_feature = RegressionModel::ObliviousTrees(ObliviousTreesModel {
            base_score: 0.0,
            trees: vec![ObliviousTree {
                features: vec![9],
                thresholds: vec![0.0],
                leaf_values: vec![1.0, 2.0],
            }],
        });
        assert!(matches!(
            bad_feature.predict(&[0.0, 0.0]).unwrap_err(),
            PricingError::Inference(_)
        ));
    }
}
