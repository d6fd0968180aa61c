use crate::ModelKind;

/// Errors from model construction, training, prediction and scoring.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Returned when a forest is configured with zero trees.
    #[error("n_trees must be at least 1, got {n_trees}")]
    InvalidTreeCount {
        /// The rejected tree count.
        n_trees: usize,
    },

    /// Returned when max_depth is `Some(0)`.
    #[error("max_depth must be at least 1, got {max_depth}")]
    InvalidMaxDepth {
        /// The rejected depth.
        max_depth: usize,
    },

    /// Returned when min_samples_split is below 2.
    #[error("min_samples_split must be at least 2, got {min_samples_split}")]
    InvalidMinSamplesSplit {
        /// The rejected value.
        min_samples_split: usize,
    },

    /// Returned when min_samples_leaf is zero.
    #[error("min_samples_leaf must be at least 1, got {min_samples_leaf}")]
    InvalidMinSamplesLeaf {
        /// The rejected value.
        min_samples_leaf: usize,
    },

    /// Returned when max_features resolves outside `[1, n_features]`.
    #[error("max_features resolved to {max_features}, but must be in [1, {n_features}]")]
    InvalidMaxFeatures {
        /// The resolved value.
        max_features: usize,
        /// Number of feature columns in the training data.
        n_features: usize,
    },

    /// Returned when a model is requested for fewer than two classes.
    #[error("at least 2 classes are required, got {n_classes}")]
    InvalidClassCount {
        /// The rejected class count.
        n_classes: usize,
    },

    /// Returned when k-nearest neighbors is configured with k = 0.
    #[error("k must be at least 1, got {k}")]
    InvalidNeighborCount {
        /// The rejected neighbor count.
        k: usize,
    },

    /// Returned when a boosting learning rate is not in (0, 1].
    #[error("learning_rate must be in (0, 1], got {learning_rate}")]
    InvalidLearningRate {
        /// The rejected rate.
        learning_rate: f64,
    },

    /// Returned when boosting is configured with zero rounds.
    #[error("n_rounds must be at least 1, got {n_rounds}")]
    InvalidRoundCount {
        /// The rejected round count.
        n_rounds: usize,
    },

    /// Returned when the training or scoring data has zero samples.
    #[error("dataset has zero samples")]
    EmptyDataset,

    /// Returned when the training data has zero feature columns.
    #[error("dataset has zero feature columns")]
    ZeroFeatures,

    /// Returned when a row has a different width than the first row.
    #[error("sample {sample_index} has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        got: usize,
        /// Zero-based index of the offending row.
        sample_index: usize,
    },

    /// Returned when the number of labels differs from the number of rows.
    #[error("{n_labels} labels supplied for {n_samples} samples")]
    LabelCountMismatch {
        /// Number of feature rows (or true labels, when scoring).
        n_samples: usize,
        /// Number of labels (or predictions, when scoring).
        n_labels: usize,
    },

    /// Returned when a label is not a valid zero-based class index.
    #[error("label {label} at sample {sample_index} is outside 0..{n_classes}")]
    LabelOutOfRange {
        /// The offending label.
        label: usize,
        /// Number of classes the model was built for.
        n_classes: usize,
        /// Zero-based index of the offending sample.
        sample_index: usize,
    },

    /// Returned when a feature value is NaN or infinite.
    #[error("non-finite value at sample {sample_index}, feature {feature_index}")]
    NonFiniteValue {
        /// Zero-based row index.
        sample_index: usize,
        /// Zero-based column index.
        feature_index: usize,
    },

    /// Returned when prediction input has a different width than training data.
    #[error("prediction input has {got} features, expected {expected}")]
    PredictionFeatureMismatch {
        /// Width seen at training time.
        expected: usize,
        /// Width of the prediction input.
        got: usize,
    },

    /// Returned when `predict` is called before `fit`.
    #[error("{model} has not been fitted")]
    NotFitted {
        /// Concrete model type name.
        model: &'static str,
    },

    /// Returned when a model kind is not compiled into this build.
    #[error("model {kind} is not available in this build")]
    ModelUnavailable {
        /// The requested kind.
        kind: ModelKind,
    },

    /// Returned when a model name cannot be parsed.
    #[error("unknown model name \"{name}\" (expected one of DT, RF, ET, GB, KNN)")]
    UnknownModelName {
        /// The rejected name.
        name: String,
    },
}
