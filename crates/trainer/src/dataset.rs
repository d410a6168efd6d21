//! CSV dataset loading, shuffling, and holdout splitting.
//!
//! The file stores raw integer columns (age in years, category codes, 0/1
//! flags, trailing 0/1 `risk` label); everything is micro-scaled on load so
//! training runs in the same fixed-point units as inference.

use crate::deterministic::row_hash;
use anemia_core::features::SCALE;
use anyhow::{Context, Result};
use std::path::Path;

/// Default holdout fraction: 20%, micro-scaled
pub const DEFAULT_TEST_FRACTION: i64 = 200_000;

/// In-memory training table, micro-scaled
#[derive(Clone, Debug)]
pub struct Dataset {
    pub features: Vec<Vec<i64>>,
    pub targets: Vec<i64>,
    pub feature_count: usize,
}

impl Dataset {
    /// Load from CSV. Empty lines and `#` comments (including the header the
    /// synthesizer writes) are skipped; every other line must hold the same
    /// number of integer columns, last column the 0/1 label.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read dataset {}", path.as_ref().display()))?;

        let mut features = Vec::new();
        let mut targets = Vec::new();
        let mut feature_count = 0;

        for (line_idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
            if parts.len() < 2 {
                anyhow::bail!("line {}: expected at least 2 columns", line_idx + 1);
            }

            if feature_count == 0 {
                feature_count = parts.len() - 1;
            } else if parts.len() - 1 != feature_count {
                anyhow::bail!(
                    "line {}: expected {} features, got {}",
                    line_idx + 1,
                    feature_count,
                    parts.len() - 1
                );
            }

            let mut row = Vec::with_capacity(feature_count);
            for (col, part) in parts.iter().take(feature_count).enumerate() {
                let raw = part.parse::<i64>().with_context(|| {
                    format!("line {}, column {}: invalid integer", line_idx + 1, col + 1)
                })?;
                row.push(raw * SCALE);
            }

            let label = parts[feature_count]
                .parse::<i64>()
                .with_context(|| format!("line {}: invalid label", line_idx + 1))?;
            if label != 0 && label != 1 {
                anyhow::bail!("line {}: label must be 0 or 1, got {}", line_idx + 1, label);
            }

            features.push(row);
            targets.push(label * SCALE);
        }

        if features.is_empty() {
            anyhow::bail!("dataset is empty");
        }

        Ok(Self {
            features,
            targets,
            feature_count,
        })
    }

    /// Deterministically shuffle rows by hash-based ordering
    pub fn shuffle(&mut self, seed: i64) {
        let n = self.features.len();

        let mut order: Vec<(i64, usize)> = (0..n)
            .map(|i| (row_hash(&self.features[i], seed), i))
            .collect();
        order.sort_by_key(|&(hash, idx)| (hash, idx));

        let mut features = Vec::with_capacity(n);
        let mut targets = Vec::with_capacity(n);
        for (_, idx) in order {
            features.push(self.features[idx].clone());
            targets.push(self.targets[idx]);
        }

        self.features = features;
        self.targets = targets;
    }

    /// Split into (train, test); `test_fraction_micro` of the rows (at least
    /// one if the dataset has more than one row) land in the test set, taken
    /// from the tail.
    pub fn split_holdout(&self, test_fraction_micro: i64) -> (Dataset, Dataset) {
        let n = self.features.len();
        let mut n_test = ((n as i64 * test_fraction_micro) / SCALE) as usize;
        if n_test == 0 && n > 1 {
            n_test = 1;
        }
        let n_train = n - n_test;

        let train = Dataset {
            features: self.features[..n_train].to_vec(),
            targets: self.targets[..n_train].to_vec(),
            feature_count: self.feature_count,
        };
        let test = Dataset {
            features: self.features[n_train..].to_vec(),
            targets: self.targets[n_train..].to_vec(),
            feature_count: self.feature_count,
        };

        (train, test)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
