//! Measurement → class ranking rules.

use crate::{LabelError, QoeClass};

/// Latency band boundaries in milliseconds.
///
/// | Latency (ms)               | Class  |
/// |----------------------------|--------|
/// | `< good_below`             | `Good` |
/// | `good_below..fair_below`   | `Fair` |
/// | `>= fair_below`            | `Poor` |
///
/// Defaults: `good_below = 50.0`, `fair_below = 100.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyThresholds {
    good_below: f64,
    fair_below: f64,
}

impl LatencyThresholds {
    /// Create thresholds from the two band boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::InvalidThresholds`] unless
    /// `0 < good_below < fair_below` and both are finite.
    pub fn new(good_below: f64, fair_below: f64) -> Result<Self, LabelError> {
        let valid = good_below.is_finite()
            && fair_below.is_finite()
            && good_below > 0.0
            && good_below < fair_below;
        if !valid {
            return Err(LabelError::InvalidThresholds { good_below, fair_below });
        }
        Ok(Self { good_below, fair_below })
    }

    /// Upper bound (exclusive) of the good band.
    #[must_use]
    pub fn good_below(&self) -> f64 {
        self.good_below
    }

    /// Upper bound (exclusive) of the fair band.
    #[must_use]
    pub fn fair_below(&self) -> f64 {
        self.fair_below
    }

    /// Rank a latency value against these thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::InvalidLatency`] for negative or non-finite input.
    pub fn rank(&self, latency_ms: f64) -> Result<QoeClass, LabelError> {
        if !latency_ms.is_finite() || latency_ms < 0.0 {
            return Err(LabelError::InvalidLatency { value: latency_ms });
        }
        let class = if latency_ms < self.good_below {
            QoeClass::Good
        } else if latency_ms < self.fair_below {
            QoeClass::Fair
        } else {
            QoeClass::Poor
        };
        Ok(class)
    }
}

impl Default for LatencyThresholds {
    fn default() -> Self {
        Self {
            good_below: 50.0,
            fair_below: 100.0,
        }
    }
}

/// Rank a latency value (ms) with the default thresholds.
///
/// # Errors
///
/// Returns [`LabelError::InvalidLatency`] for negative or non-finite input.
pub fn rank_latency(latency_ms: f64) -> Result<QoeClass, LabelError> {
    LatencyThresholds::default().rank(latency_ms)
}

/// Map a 1–5 self-reported score onto a class: 1–2 → `Poor`, 3 → `Fair`,
/// 4–5 → `Good`.
///
/// Scores are read from CSV as floats, so `4.0` is accepted but `4.5` is not.
///
/// # Errors
///
/// Returns [`LabelError::ScoreOutOfRange`] when the score is not an integer
/// in `1..=5`.
pub fn rank_survey(score: f64) -> Result<QoeClass, LabelError> {
    if score.fract() != 0.0 || !(1.0..=5.0).contains(&score) {
        return Err(LabelError::ScoreOutOfRange { score });
    }
    let class = match score as u8 {
        1 | 2 => QoeClass::Poor,
        3 => QoeClass::Fair,
        _ => QoeClass::Good,
    };
    Ok(class)
}
