use qoe_io::IoError;
use qoe_label::{LabelError, QoeClass};
use qoe_models::ModelError;

/// Errors that abort a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Returned when the dataset cannot be read or a column cannot be parsed.
    #[error("cannot load dataset")]
    Io(#[from] IoError),

    /// Returned when a label source value is outside its domain.
    #[error("cannot label row {row_index}")]
    Label {
        /// Zero-based data row index.
        row_index: usize,
        /// The rejected value.
        source: LabelError,
    },

    /// Returned when model construction, training or scoring fails.
    #[error("model failure")]
    Model(#[from] ModelError),

    /// Returned when the test fraction is not strictly between 0 and 1.
    #[error("test_fraction must be in (0, 1), got {test_fraction}")]
    InvalidTestFraction {
        /// The rejected fraction.
        test_fraction: f64,
    },

    /// Returned when the sample size is zero.
    #[error("sample_size must be at least 1")]
    InvalidSampleSize,

    /// Returned when no row has both a label and every feature.
    #[error("no complete rows remain after dropping missing values")]
    NoCompleteRows,

    /// Returned when a class is too rare to appear in both partitions.
    #[error("class {class} has {count} member(s); stratified splitting needs at least 2")]
    InsufficientClassMembers {
        /// The rare class.
        class: QoeClass,
        /// Its number of samples.
        count: usize,
    },

    /// Returned when a partition would be smaller than the number of classes.
    #[error("cannot split {n_samples} samples into {n_test} test rows across {n_classes} classes")]
    InvalidSplit {
        /// Number of samples being split.
        n_samples: usize,
        /// Requested test partition size.
        n_test: usize,
        /// Number of distinct classes present.
        n_classes: usize,
    },
}
