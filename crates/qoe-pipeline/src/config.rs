use std::fmt;
use std::path::{Path, PathBuf};

use qoe_io::schema::{LATENCY_COLUMN, SURVEY_COLUMN};
use qoe_io::WindowCatalog;
use qoe_label::{LatencyThresholds, LabelError, QoeClass};
use qoe_models::ModelKind;
use serde::Serialize;

use crate::PipelineError;

/// Column the QoE label is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSource {
    /// `ping`, ranked by latency band.
    Latency,
    /// `self_rate_qoe_score`, ranked by survey score.
    Survey,
}

impl LabelSource {
    /// Header of the column labels are read from.
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            LabelSource::Latency => LATENCY_COLUMN,
            LabelSource::Survey => SURVEY_COLUMN,
        }
    }
}

impl fmt::Display for LabelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LabelSource::Latency => "ping",
            LabelSource::Survey => "survey",
        })
    }
}

/// Settings of one pipeline run.
///
/// # Defaults
///
/// | Parameter            | Default                              |
/// |----------------------|--------------------------------------|
/// | `data`               | `output/window_10_1754904064.csv`    |
/// | `seed`               | 42                                   |
/// | `sample_size`        | 1000                                 |
/// | `test_fraction`      | 0.2                                  |
/// | `artifacts`          | `artifacts`                          |
/// | `label_source`       | [`LabelSource::Latency`]             |
/// | `latency_thresholds` | 50 ms / 100 ms                       |
/// | `model`              | [`ModelKind::RandomForest`]          |
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    data: PathBuf,
    seed: u64,
    sample_size: usize,
    test_fraction: f64,
    artifacts: PathBuf,
    label_source: LabelSource,
    latency_thresholds: LatencyThresholds,
    model: ModelKind,
}

impl PipelineConfig {
    /// Create a config with the defaults above.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dataset file.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<PathBuf>) -> Self {
        self.data = data.into();
        self
    }

    /// Set the seed used for sampling, splitting and models.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Cap the number of complete rows sampled.
    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Set the held-out fraction, in (0, 1).
    #[must_use]
    pub fn with_test_fraction(mut self, test_fraction: f64) -> Self {
        self.test_fraction = test_fraction;
        self
    }

    /// Set the artifact root directory.
    #[must_use]
    pub fn with_artifacts(mut self, artifacts: impl Into<PathBuf>) -> Self {
        self.artifacts = artifacts.into();
        self
    }

    /// Choose the column labels are derived from.
    #[must_use]
    pub fn with_label_source(mut self, label_source: LabelSource) -> Self {
        self.label_source = label_source;
        self
    }

    /// Set the latency band boundaries.
    #[must_use]
    pub fn with_latency_thresholds(mut self, thresholds: LatencyThresholds) -> Self {
        self.latency_thresholds = thresholds;
        self
    }

    /// Choose the model to train.
    #[must_use]
    pub fn with_model(mut self, model: ModelKind) -> Self {
        self.model = model;
        self
    }

    /// Return the dataset file.
    #[must_use]
    pub fn data(&self) -> &Path {
        &self.data
    }

    /// Return the seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Return the sample cap.
    #[must_use]
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Return the held-out fraction.
    #[must_use]
    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    /// Return the artifact root.
    #[must_use]
    pub fn artifacts(&self) -> &Path {
        &self.artifacts
    }

    /// Return the label source.
    #[must_use]
    pub fn label_source(&self) -> LabelSource {
        self.label_source
    }

    /// Return the model kind.
    #[must_use]
    pub fn model(&self) -> ModelKind {
        self.model
    }

    /// Rank one label-source value.
    pub(crate) fn rank(&self, value: f64) -> Result<QoeClass, LabelError> {
        match self.label_source {
            LabelSource::Latency => self.latency_thresholds.rank(value),
            LabelSource::Survey => qoe_label::rank_survey(value),
        }
    }

    /// Reject a test fraction outside (0, 1) and a zero sample size.
    pub(crate) fn check(&self) -> Result<(), PipelineError> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(PipelineError::InvalidTestFraction {
                test_fraction: self.test_fraction,
            });
        }
        if self.sample_size == 0 {
            return Err(PipelineError::InvalidSampleSize);
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let data = WindowCatalog::default()
            .path_for(10)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            data,
            seed: 42,
            sample_size: 1000,
            test_fraction: 0.2,
            artifacts: PathBuf::from("artifacts"),
            label_source: LabelSource::Latency,
            latency_thresholds: LatencyThresholds::default(),
            model: ModelKind::RandomForest,
        }
    }
}
