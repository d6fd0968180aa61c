//! QoE classifiers, the typed model registry, and classification metrics.
//!
//! Every model implements [`Classifier`] and is constructed untrained through
//! [`ModelRegistry`], keyed by [`ModelKind`]. Tree ensembles train in
//! parallel via rayon and are deterministic for a fixed seed.

#[cfg(feature = "boosting")]
mod boost;
mod classifier;
mod confusion;
mod error;
mod forest;
#[cfg(feature = "neighbors")]
mod neighbors;
mod node;
mod registry;
mod split;
mod tree;
mod validate;

#[cfg(feature = "boosting")]
pub use boost::{GradientBoosting, GradientBoostingConfig};
pub use classifier::{Classifier, ModelKind};
pub use confusion::{ClassMetrics, ConfusionMatrix};
pub use error::ModelError;
pub use forest::{MaxFeatures, RandomForest, RandomForestConfig};
#[cfg(feature = "neighbors")]
pub use neighbors::{KNearest, KNearestConfig};
pub use registry::{make_models, ModelEntry, ModelRegistry};
pub use split::{SplitCriterion, SplitMethod};
pub use tree::{DecisionTree, DecisionTreeConfig};
