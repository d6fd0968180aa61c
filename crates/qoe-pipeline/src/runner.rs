//! The end-to-end pipeline run.

use std::path::PathBuf;

use qoe_io::schema::FEATURE_COLUMNS;
use qoe_io::{ArtifactLayout, FlowTableReader};
use qoe_label::{ClassTally, QoeClass};
use qoe_models::{ClassMetrics, ConfusionMatrix, ModelKind, ModelRegistry};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{info, instrument};

use crate::sampling::{sample_indices, stratified_split};
use crate::{prepare, LabelSource, PipelineConfig, PipelineError};

/// What one run loaded, trained and scored.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    /// Dataset file read.
    pub data: PathBuf,
    /// Rows in the file.
    pub loaded_rows: usize,
    /// Column labels came from.
    pub label_source: LabelSource,
    /// Labeled rows per class code, before feature filtering.
    pub label_distribution: ClassTally,
    /// Labeled rows with every feature present.
    pub complete_rows: usize,
    /// Feature columns used.
    pub n_features: usize,
    /// Rows drawn for the split.
    pub sampled_rows: usize,
    /// Training partition size.
    pub train_size: usize,
    /// Held-out partition size.
    pub test_size: usize,
    /// Model that was trained.
    pub model: ModelKind,
    /// Concrete classifier type name.
    pub model_type: &'static str,
    /// Held-out accuracy.
    pub accuracy: f64,
    /// Held-out macro-averaged F1.
    pub macro_f1: f64,
    /// Per-class precision, recall and F1 on the held-out rows.
    pub class_metrics: Vec<ClassMetrics>,
    /// Artifact root that was created.
    pub artifacts: PathBuf,
}

fn gather<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| values[i].clone()).collect()
}

/// Load, label, sample, split, train, score and create artifact directories.
///
/// # Errors
///
/// Any stage failure is returned as-is; nothing is retried.
#[instrument(skip_all, fields(data = %config.data().display(), seed = config.seed()))]
pub fn run(config: &PipelineConfig) -> Result<PipelineSummary, PipelineError> {
    config.check()?;

    let table = FlowTableReader::new(config.data()).read()?;
    info!(loaded_rows = table.n_rows(), "dataset loaded");

    let prepared = prepare(&table, config, &FEATURE_COLUMNS)?;
    let complete_rows = prepared.n_rows();

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed());
    let sample = sample_indices(complete_rows, config.sample_size(), &mut rng);
    let features = gather(&prepared.features, &sample);
    let labels = gather(&prepared.labels, &sample);
    info!(sampled_rows = sample.len(), "rows sampled");

    let mut split_rng = ChaCha8Rng::seed_from_u64(config.seed());
    let split = stratified_split(&labels, config.test_fraction(), &mut split_rng)?;
    let index_of = |classes: Vec<QoeClass>| -> Vec<usize> {
        classes.into_iter().map(QoeClass::index).collect()
    };
    let train_x = gather(&features, &split.train);
    let train_y = index_of(gather(&labels, &split.train));
    let test_x = gather(&features, &split.test);
    let test_y = index_of(gather(&labels, &split.test));
    info!(train = train_x.len(), test = test_x.len(), "stratified split");

    let registry = ModelRegistry::new(QoeClass::COUNT)?.with_seed(config.seed());
    let mut model = registry.build(config.model())?;
    model.fit(&train_x, &train_y)?;
    let predicted = model.predict(&test_x)?;
    let confusion = ConfusionMatrix::from_labels(&test_y, &predicted, QoeClass::COUNT)?;
    let accuracy = confusion.accuracy();
    let macro_f1 = confusion.macro_f1();
    info!(model = %config.model(), accuracy, macro_f1, "model scored");

    let layout = ArtifactLayout::new(config.artifacts());
    layout.create()?;
    info!(root = %layout.root().display(), "artifact directories ready");

    Ok(PipelineSummary {
        data: config.data().to_path_buf(),
        loaded_rows: table.n_rows(),
        label_source: config.label_source(),
        label_distribution: prepared.label_distribution,
        complete_rows,
        n_features: FEATURE_COLUMNS.len(),
        sampled_rows: sample.len(),
        train_size: train_x.len(),
        test_size: test_x.len(),
        model: config.model(),
        model_type: model.type_name(),
        accuracy,
        macro_f1,
        class_metrics: confusion.class_metrics(),
        artifacts: layout.root().to_path_buf(),
    })
}
