//! Path attribution for single predictions.
//!
//! For every tree, walk the decision path root to leaf; at each split, the
//! change in node expected value is attributed to the split feature. The
//! per-tree deltas telescope to `leaf - root`, so across the ensemble the
//! attribution vector sums to `score - baseline`.
//!
//! Deltas are accumulated per feature at full `expected * weight` precision
//! and divided by the model scale once at the end, so the additive identity
//! holds exactly for [`Explanation::score`]; it can differ from
//! [`Model::score`] by at most one micro unit per tree (per-tree rounding).

use crate::features::FEATURE_NAMES;
use crate::gbdt::Model;

/// Signed per-feature attribution value (micro-scaled).
///
/// Positive values push the prediction toward at-risk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureContribution {
    pub feature_idx: usize,
    pub value: i64,
}

impl FeatureContribution {
    pub fn feature_name(&self) -> String {
        FEATURE_NAMES
            .get(self.feature_idx)
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("feature_{}", self.feature_idx))
    }
}

/// Attribution for one prediction
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Model baseline (bias plus root expectations)
    pub baseline: i64,

    /// `baseline` plus the sum of all contributions
    pub score: i64,

    /// One signed value per input feature, in schema order
    pub contributions: Vec<FeatureContribution>,
}

impl Explanation {
    /// The `k` contributions with the largest absolute values.
    ///
    /// Ties in absolute magnitude are broken by original feature order.
    pub fn top(&self, k: usize) -> Vec<&FeatureContribution> {
        let mut ranked: Vec<&FeatureContribution> = self.contributions.iter().collect();
        ranked.sort_by(|a, b| {
            b.value
                .abs()
                .cmp(&a.value.abs())
                .then(a.feature_idx.cmp(&b.feature_idx))
        });
        ranked.truncate(k);
        ranked
    }

    /// Human-readable summary of the top `k` contributions, e.g.
    /// `"diet (increases risk by 0.42), age (decreases risk by 0.03)"`.
    pub fn top_text(&self, k: usize) -> String {
        self.top(k)
            .iter()
            .map(|c| {
                let direction = if c.value > 0 { "increases" } else { "decreases" };
                format!(
                    "{} ({} risk by {})",
                    c.feature_name(),
                    direction,
                    format_micro_2dp(c.value.abs())
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Compute the attribution vector for one feature vector.
///
/// Returns one contribution per input feature (zero for features the
/// decision paths never touch).
pub fn explain(model: &Model, features: &[i64]) -> Explanation {
    let mut raw = vec![0i128; features.len()];

    for tree in &model.trees {
        let mut idx = 0usize;

        loop {
            let Some(node) = tree.nodes.get(idx) else {
                break;
            };
            if node.is_leaf() {
                break;
            }

            let feature_idx = node.feature_idx as usize;
            let Some(&value) = features.get(feature_idx) else {
                break;
            };

            let next = if value <= node.threshold {
                node.left
            } else {
                node.right
            };
            if next < 0 || next as usize >= tree.nodes.len() {
                break;
            }

            let child = &tree.nodes[next as usize];
            raw[feature_idx] += (child.expected - node.expected) as i128 * tree.weight as i128;
            idx = next as usize;
        }
    }

    let contributions: Vec<FeatureContribution> = raw
        .iter()
        .enumerate()
        .map(|(feature_idx, &total)| FeatureContribution {
            feature_idx,
            value: (total / model.scale as i128) as i64,
        })
        .collect();

    let baseline = model.baseline();
    let score = baseline + contributions.iter().map(|c| c.value).sum::<i64>();

    Explanation {
        baseline,
        score,
        contributions,
    }
}

/// Format a non-negative micro-scaled value with two decimals, rounding
/// half up (e.g. 425_000 -> "0.43")
pub fn format_micro_2dp(micro: i64) -> String {
    let hundredths = (micro.max(0) + 5_000) / 10_000;
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}
