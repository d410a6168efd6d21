//! GBDT model: scoring, the risk decision rule, and persistence.
//!
//! The serialized artifact is canonical JSON hashed with blake3; the trainer
//! writes it, the server loads it verbatim, nothing else inspects it.

use super::tree::Tree;
use crate::canonical::{hash_canonical_hex, to_canonical_json, CanonicalError};
use crate::features::SCALE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model validation failed: {0}")]
    ValidationFailed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("canonical serialization error: {0}")]
    Canonical(#[from] CanonicalError),
}

/// Decision threshold on the raw score: at-risk iff score >= SCALE/2.
///
/// Targets are {0, SCALE}, so the score approximates the at-risk probability
/// at micro scale and 0.5 is the midpoint.
pub const RISK_THRESHOLD: i64 = SCALE / 2;

/// Boosted-tree binary risk model, integer-only.
///
/// Raw score = bias + sum over trees of `leaf * weight / scale`. All values
/// are micro-scaled integers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Model {
    /// Model format version (always 1 for now)
    pub version: i32,

    /// Fixed-point scale factor dividing tree contributions
    pub scale: i64,

    /// Decision trees in the ensemble
    pub trees: Vec<Tree>,

    /// Bias term: the training-set mean target (fixed-point integer)
    pub bias: i64,
}

impl Model {
    pub fn new(trees: Vec<Tree>, bias: i64) -> Self {
        Self {
            version: 1,
            scale: SCALE,
            trees,
            bias,
        }
    }

    /// Validate model structure
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.version != 1 {
            return Err(ModelError::ValidationFailed(format!(
                "unsupported model version: {}",
                self.version
            )));
        }
        if self.scale <= 0 {
            return Err(ModelError::ValidationFailed(format!(
                "invalid scale: {}",
                self.scale
            )));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate()
                .map_err(|e| ModelError::ValidationFailed(format!("tree {i}: {e}")))?;
        }
        Ok(())
    }

    /// Raw model score for a feature vector (micro-scaled)
    pub fn score(&self, features: &[i64]) -> i64 {
        let mut sum = self.bias;

        for tree in &self.trees {
            let leaf_value = tree.evaluate(features);
            let weighted = leaf_value.checked_mul(tree.weight).unwrap_or(0);
            sum = sum.saturating_add(weighted / self.scale);
        }

        sum
    }

    /// Binary risk decision: score thresholded at [`RISK_THRESHOLD`]
    pub fn predict_at_risk(&self, features: &[i64]) -> bool {
        self.score(features) >= RISK_THRESHOLD
    }

    /// Expected output with no feature information: the bias plus every
    /// tree's root expectation. This is the zero-reference the attribution
    /// values are measured against.
    pub fn baseline(&self) -> i64 {
        let mut sum = self.bias as i128;
        for tree in &self.trees {
            let root = tree.root().map(|n| n.expected).unwrap_or(0);
            sum += root as i128 * tree.weight as i128 / self.scale as i128;
        }
        sum as i64
    }

    /// Serialize to canonical JSON (sorted keys, no whitespace)
    pub fn to_canonical_json(&self) -> Result<String, ModelError> {
        Ok(to_canonical_json(self)?)
    }

    /// Blake3 hash of the canonical JSON, hex-encoded
    pub fn hash_hex(&self) -> Result<String, ModelError> {
        Ok(hash_canonical_hex(self)?)
    }

    /// Save to a JSON file with canonical serialization
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        let json = self.to_canonical_json()?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load from a JSON file and validate
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let json = fs::read_to_string(path)?;
        let model: Model = serde_json::from_str(&json)?;
        model.validate()?;
        Ok(model)
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}
