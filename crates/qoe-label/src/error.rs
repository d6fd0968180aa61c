//! Labeling error types.

/// Errors from mapping raw measurements onto QoE classes.
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    /// Returned when a latency value is negative, NaN, or infinite.
    #[error("latency must be a finite, non-negative number of milliseconds, got {value}")]
    InvalidLatency {
        /// The rejected latency value.
        value: f64,
    },

    /// Returned when a survey score is not an integer in `1..=5`.
    #[error("survey score must be an integer in 1..=5, got {score}")]
    ScoreOutOfRange {
        /// The rejected score.
        score: f64,
    },

    /// Returned when an integer code does not name a class.
    #[error("QoE class code must be 1, 2 or 3, got {code}")]
    UnknownClassCode {
        /// The rejected code.
        code: u8,
    },

    /// Returned when a class name cannot be parsed.
    #[error("unknown QoE class name \"{name}\" (expected poor, fair or good)")]
    UnknownClassName {
        /// The rejected name.
        name: String,
    },

    /// Returned when latency thresholds are not strictly increasing and positive.
    #[error("latency thresholds must satisfy 0 < good ({good_below}) < fair ({fair_below})")]
    InvalidThresholds {
        /// Upper bound (exclusive) of the good band.
        good_below: f64,
        /// Upper bound (exclusive) of the fair band.
        fair_below: f64,
    },
}
