//! Deterministic GBDT inference engine.
//!
//! Fixed-point only: every feature value, threshold, leaf value, and score is
//! an `i64` at micro scale. The same input always produces the same output on
//! every platform, and the serialized model uses canonical JSON (sorted keys,
//! no whitespace) so its blake3 hash is reproducible.
//!
//! Each node carries its `expected` value (the mean residual of the training
//! samples that reached it). Inference only needs the leaves; the per-split
//! expected-value deltas are what the path attribution in
//! [`crate::explain`] walks.

pub mod model;
pub mod tree;

pub use model::{Model, ModelError, RISK_THRESHOLD};
pub use tree::{Node, Tree};
