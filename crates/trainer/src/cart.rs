//! Exact-greedy CART builder for one boosting round.
//!
//! Deterministic, fixed-point only: quantized candidate thresholds, i128
//! intermediate arithmetic, and explicit tie-breaking on equal gains. Every
//! node records its expected value (mean residual of the samples that
//! reached it), which the attribution walk consumes at inference time.

use anemia_core::{Node, Tree};
use std::collections::BTreeMap;

use crate::deterministic::SplitTieBreaker;

/// Fixed-point hessian unit for the constant-hessian MSE loss
pub const HESSIAN_UNIT: i64 = 1000;

/// Parameters for a single tree
#[derive(Clone, Debug)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    pub quant_step: i64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 6,
            min_samples_leaf: 32,
            quant_step: 1_000_000,
        }
    }
}

#[derive(Clone, Debug)]
struct Sample {
    features: Vec<i64>,
    gradient: i64,
    hessian: i64,
}

#[derive(Debug, Clone)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: i64,
    gain: i64,
    tie_breaker: SplitTieBreaker,
}

/// Build one regression tree with the exact-greedy CART algorithm
pub struct CartBuilder {
    params: TreeParams,
    samples: Vec<Sample>,
    feature_count: usize,
}

impl CartBuilder {
    pub fn new(
        features: &[Vec<i64>],
        gradients: &[i64],
        hessians: &[i64],
        params: TreeParams,
    ) -> Self {
        assert_eq!(features.len(), gradients.len());
        assert_eq!(features.len(), hessians.len());

        let samples: Vec<Sample> = features
            .iter()
            .zip(gradients.iter().zip(hessians.iter()))
            .map(|(f, (&g, &h))| Sample {
                features: f.clone(),
                gradient: g,
                hessian: h,
            })
            .collect();

        let feature_count = samples.first().map(|s| s.features.len()).unwrap_or(0);

        Self {
            params,
            samples,
            feature_count,
        }
    }

    /// Build the tree; the caller assigns the ensemble weight
    pub fn build(&self, weight: i64) -> Tree {
        let mut nodes = Vec::new();
        let indices: Vec<usize> = (0..self.samples.len()).collect();

        self.build_node(&indices, 0, &mut nodes, 0);

        Tree::new(nodes, weight)
    }

    fn build_node(
        &self,
        indices: &[usize],
        depth: usize,
        nodes: &mut Vec<Node>,
        node_id: usize,
    ) -> i32 {
        let current_idx = nodes.len() as i32;
        let node_value = self.node_value(indices);

        if depth >= self.params.max_depth || indices.len() < 2 * self.params.min_samples_leaf {
            nodes.push(Node::leaf(current_idx, node_value));
            return current_idx;
        }

        let Some(split) = self.find_best_split(indices, node_id) else {
            nodes.push(Node::leaf(current_idx, node_value));
            return current_idx;
        };

        let (left_indices, right_indices) =
            self.partition(indices, split.feature_idx, split.threshold);

        if left_indices.len() < self.params.min_samples_leaf
            || right_indices.len() < self.params.min_samples_leaf
        {
            nodes.push(Node::leaf(current_idx, node_value));
            return current_idx;
        }

        // Reserve the slot; children are wired in after they are built
        nodes.push(Node::internal(
            current_idx,
            split.feature_idx as i32,
            split.threshold,
            0,
            0,
            node_value,
        ));

        let left = self.build_node(&left_indices, depth + 1, nodes, node_id * 2 + 1);
        let right = self.build_node(&right_indices, depth + 1, nodes, node_id * 2 + 2);

        nodes[current_idx as usize].left = left;
        nodes[current_idx as usize].right = right;

        current_idx
    }

    fn find_best_split(&self, indices: &[usize], node_id: usize) -> Option<SplitCandidate> {
        let mut best: Option<SplitCandidate> = None;

        for feature_idx in 0..self.feature_count {
            for threshold in self.quantized_thresholds(indices, feature_idx) {
                let (left, right) = self.partition(indices, feature_idx, threshold);

                if left.len() < self.params.min_samples_leaf
                    || right.len() < self.params.min_samples_leaf
                {
                    continue;
                }

                let gain = self.split_gain(&left, &right, indices);
                let candidate = SplitCandidate {
                    feature_idx,
                    threshold,
                    gain,
                    tie_breaker: SplitTieBreaker::new(feature_idx, threshold, node_id),
                };

                best = match best {
                    None => Some(candidate),
                    Some(current) => {
                        if gain > current.gain
                            || (gain == current.gain && candidate.tie_breaker < current.tie_breaker)
                        {
                            Some(candidate)
                        } else {
                            Some(current)
                        }
                    }
                };
            }
        }

        best
    }

    /// Distinct quantized values of a feature within the node's samples
    fn quantized_thresholds(&self, indices: &[usize], feature_idx: usize) -> Vec<i64> {
        let mut values = BTreeMap::new();
        for &idx in indices {
            let val = self.samples[idx].features[feature_idx];
            let quantized = (val / self.params.quant_step) * self.params.quant_step;
            values.insert(quantized, ());
        }
        values.into_keys().collect()
    }

    fn partition(
        &self,
        indices: &[usize],
        feature_idx: usize,
        threshold: i64,
    ) -> (Vec<usize>, Vec<usize>) {
        let mut left = Vec::new();
        let mut right = Vec::new();

        for &idx in indices {
            if self.samples[idx].features[feature_idx] <= threshold {
                left.push(idx);
            } else {
                right.push(idx);
            }
        }

        (left, right)
    }

    /// Gain = G_left²/H_left + G_right²/H_right - G_parent²/H_parent
    fn split_gain(&self, left: &[usize], right: &[usize], parent: &[usize]) -> i64 {
        let part = |indices: &[usize]| -> i64 {
            let (g, h) = self.sums(indices);
            if h > 0 {
                ((g as i128 * g as i128) / h as i128) as i64
            } else {
                0
            }
        };

        part(left)
            .saturating_add(part(right))
            .saturating_sub(part(parent))
    }

    fn sums(&self, indices: &[usize]) -> (i64, i64) {
        let mut sum_g = 0i64;
        let mut sum_h = 0i64;
        for &idx in indices {
            sum_g = sum_g.saturating_add(self.samples[idx].gradient);
            sum_h = sum_h.saturating_add(self.samples[idx].hessian);
        }
        (sum_g, sum_h)
    }

    /// Optimal value -G/H for a node's samples; serves as the leaf value for
    /// leaves and the expected value for internal nodes
    fn node_value(&self, indices: &[usize]) -> i64 {
        let (sum_g, sum_h) = self.sums(indices);
        if sum_h == 0 {
            return 0;
        }
        let value = -((sum_g as i128 * HESSIAN_UNIT as i128) / sum_h as i128);
        value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_split() {
        // Two clusters separable on feature 0
        let features = vec![
            vec![100_000, 200_000],
            vec![200_000, 300_000],
            vec![3_000_000, 400_000],
            vec![4_000_000, 500_000],
        ];
        let gradients = vec![-1000, -1000, 1000, 1000];
        let hessians = vec![HESSIAN_UNIT; 4];

        let params = TreeParams {
            max_depth: 2,
            min_samples_leaf: 1,
            quant_step: 100_000,
        };

        let tree = CartBuilder::new(&features, &gradients, &hessians, params).build(1_000_000);
        assert!(tree.validate().is_ok());
        assert!(tree.nodes.len() >= 3);

        // Left cluster has gradient -1000 -> value +1000; right cluster -1000
        assert_eq!(tree.evaluate(&[100_000, 0]), 1000);
        assert_eq!(tree.evaluate(&[4_000_000, 0]), -1000);
    }

    #[test]
    fn test_internal_nodes_carry_expected_values() {
        let features = vec![
            vec![0],
            vec![0],
            vec![2_000_000],
            vec![2_000_000],
        ];
        let gradients = vec![-2000, -2000, 2000, 2000];
        let hessians = vec![HESSIAN_UNIT; 4];

        let params = TreeParams {
            max_depth: 2,
            min_samples_leaf: 1,
            quant_step: 1_000_000,
        };
        let tree = CartBuilder::new(&features, &gradients, &hessians, params).build(1_000_000);

        // Root gradient sums to zero -> expected 0; leaves are +/-2000
        let root = tree.root().unwrap();
        assert!(!root.is_leaf());
        assert_eq!(root.expected, 0);
        assert_eq!(tree.evaluate(&[0]), 2000);
        assert_eq!(tree.evaluate(&[2_000_000]), -2000);
    }

    #[test]
    fn test_leaf_only_tree() {
        let features = vec![vec![100_000]];
        let gradients = vec![-1000];
        let hessians = vec![HESSIAN_UNIT];

        let tree =
            CartBuilder::new(&features, &gradients, &hessians, TreeParams::default()).build(1);
        assert_eq!(tree.nodes.len(), 1);
        assert!(tree.nodes[0].is_leaf());
        assert_eq!(tree.nodes[0].leaf, Some(1000));
    }

    #[test]
    fn test_deterministic_build() {
        let features = vec![
            vec![100_000, 5_000_000],
            vec![900_000, 1_000_000],
            vec![2_100_000, 3_000_000],
            vec![3_300_000, 2_000_000],
            vec![4_000_000, 4_000_000],
            vec![5_200_000, 600_000],
        ];
        let gradients = vec![-3000, -1000, 500, 1500, 2500, 3500];
        let hessians = vec![HESSIAN_UNIT; 6];
        let params = TreeParams {
            max_depth: 3,
            min_samples_leaf: 1,
            quant_step: 1_000_000,
        };

        let tree1 =
            CartBuilder::new(&features, &gradients, &hessians, params.clone()).build(1_000_000);
        let tree2 = CartBuilder::new(&features, &gradients, &hessians, params).build(1_000_000);
        assert_eq!(tree1, tree2);
    }
}
