//! Offline trainer for the anemia risk model.
//!
//! Deterministic end to end: LCG-driven dataset synthesis, hash-based
//! shuffling, exact-greedy CART splits with fixed tie-breaking, and
//! fixed-point boosting. The same seed and parameters always produce a
//! byte-identical model artifact.

pub mod cart;
pub mod dataset;
pub mod deterministic;
pub mod synth;
pub mod trainer;

use anemia_core::Model;
use anyhow::Result;
use std::path::Path;

pub use dataset::Dataset;
pub use deterministic::{row_hash, LcgRng, SplitTieBreaker};
pub use synth::{risk_label, synthesize, SynthConfig};
pub use trainer::{evaluate_accuracy, GbdtTrainer, TrainParams};

/// Train a model directly from a CSV file: deterministic shuffle, 80/20
/// holdout split, boosting, and a held-out accuracy figure (micro-scaled).
pub fn train_from_csv(path: &Path, params: TrainParams, seed: i64) -> Result<(Model, i64)> {
    let mut dataset = Dataset::from_csv(path)?;
    dataset.shuffle(seed);

    let (train, test) = dataset.split_holdout(dataset::DEFAULT_TEST_FRACTION);
    let model = GbdtTrainer::new(params).train(&train)?;
    let accuracy = evaluate_accuracy(&model, &test);

    Ok((model, accuracy))
}
