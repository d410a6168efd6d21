//! Decision tree structures for GBDT inference.
//!
//! Integer-only nodes and traversal. Besides the usual split fields, every
//! node stores `expected`: the mean residual of the training samples that
//! reached it, which the attribution walk consumes. For leaves, `expected`
//! equals the leaf value.

use serde::{Deserialize, Serialize};

/// A decision tree node (internal or leaf).
///
/// Internal nodes have `feature_idx >= 0` and valid `left`/`right` child
/// indices; leaves have `feature_idx == -1` and a `leaf` value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Node {
    /// Node ID (position in the node array)
    pub id: i32,

    /// Left child index (-1 for leaf nodes)
    pub left: i32,

    /// Right child index (-1 for leaf nodes)
    pub right: i32,

    /// Feature index to split on (-1 for leaf nodes)
    pub feature_idx: i32,

    /// Split threshold (fixed-point integer); samples with
    /// `feature <= threshold` go left
    pub threshold: i64,

    /// Expected prediction at this node (fixed-point integer)
    pub expected: i64,

    /// Leaf value (Some for leaf nodes, None for internal nodes)
    pub leaf: Option<i64>,
}

impl Node {
    /// Create an internal (split) node
    pub fn internal(
        id: i32,
        feature_idx: i32,
        threshold: i64,
        left: i32,
        right: i32,
        expected: i64,
    ) -> Self {
        Self {
            id,
            left,
            right,
            feature_idx,
            threshold,
            expected,
            leaf: None,
        }
    }

    /// Create a leaf node
    pub fn leaf(id: i32, value: i64) -> Self {
        Self {
            id,
            left: -1,
            right: -1,
            feature_idx: -1,
            threshold: 0,
            expected: value,
            leaf: Some(value),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.feature_idx == -1 || self.leaf.is_some()
    }
}

/// A single decision tree with integer-only nodes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tree {
    /// Tree nodes (node 0 is the root)
    pub nodes: Vec<Node>,

    /// Tree weight for ensemble aggregation (fixed-point integer)
    pub weight: i64,
}

impl Tree {
    pub fn new(nodes: Vec<Node>, weight: i64) -> Self {
        Self { nodes, weight }
    }

    /// Evaluate this tree on a feature vector.
    ///
    /// Integer `<=` comparison at every split; malformed structure or an
    /// out-of-range feature index evaluates to 0 rather than panicking.
    pub fn evaluate(&self, features: &[i64]) -> i64 {
        let mut idx = 0usize;

        loop {
            let Some(node) = self.nodes.get(idx) else {
                return 0;
            };

            if node.is_leaf() {
                return node.leaf.unwrap_or(0);
            }

            let feature_idx = node.feature_idx as usize;
            let Some(&value) = features.get(feature_idx) else {
                return 0;
            };

            let next = if value <= node.threshold {
                node.left
            } else {
                node.right
            };
            if next < 0 || next as usize >= self.nodes.len() {
                return 0;
            }
            idx = next as usize;
        }
    }

    /// The root node, if the tree is non-empty
    pub fn root(&self) -> Option<&Node> {
        self.nodes.first()
    }

    /// Validate node wiring: child indices in range, internal nodes have a
    /// feature index, leaves have a value.
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                if node.leaf.is_none() {
                    return Err(format!("leaf node {i} has no leaf value"));
                }
                continue;
            }

            if node.feature_idx < 0 {
                return Err(format!(
                    "internal node {} has invalid feature index {}",
                    i, node.feature_idx
                ));
            }
            if node.left < 0 || node.left as usize >= self.nodes.len() {
                return Err(format!("node {} has invalid left child {}", i, node.left));
            }
            if node.right < 0 || node.right as usize >= self.nodes.len() {
                return Err(format!("node {} has invalid right child {}", i, node.right));
            }
        }

        Ok(())
    }
}
