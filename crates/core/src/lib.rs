//! Core types for the anemia risk service.
//!
//! Provides the shared feature schema, the deterministic fixed-point GBDT
//! inference engine, per-prediction path attribution, and the static diet
//! recommendation rules. Training lives in `anemia-trainer`, the HTTP
//! boundary in `anemia-server`.

pub mod canonical;
pub mod explain;
pub mod features;
pub mod gbdt;
pub mod recommend;

pub use explain::{format_micro_2dp, Explanation, FeatureContribution};
pub use features::{InputRecord, FEATURE_COUNT, FEATURE_NAMES, SCALE, SYMPTOM_NAMES};
pub use gbdt::{Model, ModelError, Node, Tree};
pub use recommend::diet_recommendations;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
