//! Gradient boosting loop.
//!
//! Fixed-point MSE boosting on {0, SCALE} targets: initialize predictions at
//! the target mean, fit one CART tree per round on the residuals, and shrink
//! each tree by the learning rate. The decision rule thresholds the raw
//! score at SCALE/2.

use anemia_core::features::SCALE;
use anemia_core::{Model, Tree};
use anyhow::Result;

use crate::cart::{CartBuilder, TreeParams, HESSIAN_UNIT};
use crate::dataset::Dataset;

/// Boosting parameters
#[derive(Clone, Debug)]
pub struct TrainParams {
    pub num_trees: usize,
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    /// Learning rate, micro-scaled (100_000 = 0.1)
    pub learning_rate: i64,
    /// Quantization step for candidate thresholds
    pub quant_step: i64,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            num_trees: 64,
            max_depth: 6,
            min_samples_leaf: 32,
            learning_rate: 100_000,
            quant_step: 1_000_000,
        }
    }
}

pub struct GbdtTrainer {
    params: TrainParams,
}

impl GbdtTrainer {
    pub fn new(params: TrainParams) -> Self {
        Self { params }
    }

    /// Fit a model on the dataset
    pub fn train(&self, dataset: &Dataset) -> Result<Model> {
        if dataset.is_empty() {
            anyhow::bail!("cannot train on an empty dataset");
        }

        let bias = mean(&dataset.targets);
        let mut predictions = vec![bias; dataset.len()];
        let mut trees = Vec::with_capacity(self.params.num_trees);

        for tree_idx in 0..self.params.num_trees {
            tracing::debug!("training tree {}/{}", tree_idx + 1, self.params.num_trees);

            let (gradients, hessians) = residuals(&dataset.targets, &predictions);

            let tree_params = TreeParams {
                max_depth: self.params.max_depth,
                min_samples_leaf: self.params.min_samples_leaf,
                quant_step: self.params.quant_step,
            };
            let tree = CartBuilder::new(&dataset.features, &gradients, &hessians, tree_params)
                .build(self.params.learning_rate);

            update_predictions(&tree, &dataset.features, &mut predictions);
            trees.push(tree);
        }

        let model = Model::new(trees, bias);
        model.validate()?;
        Ok(model)
    }
}

/// Mean of the targets, the initial bias
fn mean(targets: &[i64]) -> i64 {
    if targets.is_empty() {
        return 0;
    }
    let sum: i128 = targets.iter().map(|&t| t as i128).sum();
    (sum / targets.len() as i128) as i64
}

/// MSE gradients (prediction - target) with a constant fixed-point hessian
fn residuals(targets: &[i64], predictions: &[i64]) -> (Vec<i64>, Vec<i64>) {
    let gradients: Vec<i64> = predictions
        .iter()
        .zip(targets.iter())
        .map(|(&p, &t)| p.saturating_sub(t))
        .collect();
    let hessians = vec![HESSIAN_UNIT; targets.len()];
    (gradients, hessians)
}

/// Add each sample's shrunken tree output to its running prediction, using
/// the same weight/scale arithmetic as [`Model::score`]
fn update_predictions(tree: &Tree, features: &[Vec<i64>], predictions: &mut [i64]) {
    for (pred, row) in predictions.iter_mut().zip(features.iter()) {
        let value = tree.evaluate(row);
        let shrunk = (value as i128 * tree.weight as i128 / SCALE as i128) as i64;
        *pred = pred.saturating_add(shrunk);
    }
}

/// Held-out accuracy of the SCALE/2 decision rule, micro-scaled
/// (1_000_000 = 100%)
pub fn evaluate_accuracy(model: &Model, dataset: &Dataset) -> i64 {
    if dataset.is_empty() {
        return 0;
    }

    let correct = dataset
        .features
        .iter()
        .zip(dataset.targets.iter())
        .filter(|(row, &target)| model.predict_at_risk(row) == (target >= SCALE / 2))
        .count();

    (correct as i64 * SCALE) / dataset.len() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_dataset() -> Dataset {
        // Label is 1 iff feature 0 is zero
        let mut features = Vec::new();
        let mut targets = Vec::new();
        for i in 0..40 {
            let flag = i % 2;
            features.push(vec![flag * SCALE, (i % 3) * SCALE]);
            targets.push((1 - flag) * SCALE);
        }
        Dataset {
            features,
            targets,
            feature_count: 2,
        }
    }

    fn small_params() -> TrainParams {
        TrainParams {
            num_trees: 16,
            max_depth: 3,
            min_samples_leaf: 2,
            learning_rate: 100_000,
            quant_step: 1_000_000,
        }
    }

    #[test]
    fn test_train_learns_separable_labels() {
        let dataset = separable_dataset();
        let model = GbdtTrainer::new(small_params()).train(&dataset).unwrap();

        assert_eq!(model.num_trees(), 16);
        assert!(model.predict_at_risk(&[0, 0]));
        assert!(!model.predict_at_risk(&[SCALE, 0]));
        assert_eq!(evaluate_accuracy(&model, &dataset), SCALE);
    }

    #[test]
    fn test_training_is_deterministic() {
        let dataset = separable_dataset();
        let model1 = GbdtTrainer::new(small_params()).train(&dataset).unwrap();
        let model2 = GbdtTrainer::new(small_params()).train(&dataset).unwrap();

        assert_eq!(model1, model2);
        assert_eq!(
            model1.hash_hex().unwrap(),
            model2.hash_hex().unwrap()
        );
    }

    #[test]
    fn test_bias_is_target_mean() {
        let dataset = separable_dataset();
        let model = GbdtTrainer::new(small_params()).train(&dataset).unwrap();
        assert_eq!(model.bias, SCALE / 2);
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let dataset = Dataset {
            features: vec![],
            targets: vec![],
            feature_count: 0,
        };
        assert!(GbdtTrainer::new(small_params()).train(&dataset).is_err());
    }
}
