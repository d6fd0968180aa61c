//! Full pipeline runs on synthetic window exports.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use qoe_io::schema::{FEATURE_COLUMNS, REQUIRED_COLUMNS};
use qoe_io::IoError;
use qoe_pipeline::{run, LabelSource, PipelineConfig, PipelineError};

/// `n_rows` rows cycling through latency bands; features shift with the band.
/// Every 50th row has a missing feature and row 7 has no latency.
fn write_window(dir: &Path, n_rows: usize) -> PathBuf {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut out = String::new();
    let header: Vec<&str> = FEATURE_COLUMNS.iter().chain(&REQUIRED_COLUMNS).copied().collect();
    writeln!(out, "{}", header.join(",")).unwrap();
    for i in 0..n_rows {
        let band = i % 3;
        let features: Vec<String> = (0..FEATURE_COLUMNS.len())
            .map(|f| {
                if i % 50 == 49 && f == 10 {
                    String::new()
                } else {
                    let signal = if f % 3 == 0 { band as f64 * 4.0 } else { 0.0 };
                    format!("{:.4}", signal + rng.r#gen::<f64>())
                }
            })
            .collect();
        let ping = match band {
            0 => 10.0 + rng.r#gen::<f64>() * 30.0,
            1 => 55.0 + rng.r#gen::<f64>() * 40.0,
            _ => 120.0 + rng.r#gen::<f64>() * 200.0,
        };
        let ping = if i == 7 { String::new() } else { format!("{ping:.2}") };
        let survey = 5 - band * 2;
        writeln!(out, "{},{ping},{survey},exp_{}", features.join(","), i / 100).unwrap();
    }
    let path = dir.join("window_10.csv");
    std::fs::write(&path, out).unwrap();
    path
}

fn config(dir: &Path, data: PathBuf) -> PipelineConfig {
    PipelineConfig::new()
        .with_data(data)
        .with_artifacts(dir.join("artifacts"))
}

#[test]
fn thousand_row_sample_with_eighty_twenty_split() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_window(dir.path(), 1300);
    let summary = run(&config(dir.path(), data)).unwrap();

    assert_eq!(summary.loaded_rows, 1300);
    assert_eq!(summary.label_distribution.total(), 1299);
    assert_eq!(summary.complete_rows, 1300 - 1 - 26);
    assert_eq!(summary.sampled_rows, 1000);
    assert_eq!(summary.train_size, 800);
    assert_eq!(summary.test_size, 200);
    assert_eq!(summary.model_type, "RandomForestClassifier");
    assert!((0.0..=1.0).contains(&summary.accuracy));
    assert!((0.0..=1.0).contains(&summary.macro_f1));
    assert!(summary.accuracy > 0.8, "accuracy {}", summary.accuracy);

    let artifacts = dir.path().join("artifacts");
    assert!(artifacts.join("figures").is_dir());
    assert!(artifacts.join("tables").is_dir());
}

#[test]
fn repeated_runs_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_window(dir.path(), 1100);
    let cfg = config(dir.path(), data);
    let first = run(&cfg).unwrap();
    let second = run(&cfg).unwrap();
    assert_eq!(first.sampled_rows, second.sampled_rows);
    assert_eq!(first.train_size, second.train_size);
    assert_eq!(first.test_size, second.test_size);
    assert_eq!(first.accuracy, second.accuracy);
    assert_eq!(first.macro_f1, second.macro_f1);
}

#[test]
fn small_dataset_uses_every_row() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_window(dir.path(), 301);
    let summary = run(&config(dir.path(), data)).unwrap();
    // 301 rows, minus row 7 and rows 49, 99, ..., 299.
    assert_eq!(summary.complete_rows, 294);
    assert_eq!(summary.sampled_rows, 294);
    assert_eq!(summary.test_size, 59);
    assert_eq!(summary.train_size, 235);
}

#[test]
fn survey_labels_and_other_models() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_window(dir.path(), 400);
    let cfg = config(dir.path(), data)
        .with_label_source(LabelSource::Survey)
        .with_model(qoe_models::ModelKind::DecisionTree);
    let summary = run(&cfg).unwrap();
    assert_eq!(summary.label_source, LabelSource::Survey);
    assert_eq!(summary.model_type, "DecisionTreeClassifier");
    // Survey scores are present on row 7 even though latency is not.
    assert_eq!(summary.label_distribution.total(), 400);
}

#[test]
fn existing_artifact_tree_is_reused() {
    let dir = tempfile::tempdir().unwrap();
    let tables = dir.path().join("artifacts").join("tables");
    std::fs::create_dir_all(&tables).unwrap();
    std::fs::write(tables.join("previous.csv"), "x\n").unwrap();

    let data = write_window(dir.path(), 200);
    run(&config(dir.path(), data)).unwrap();
    assert!(tables.join("previous.csv").is_file());
}

#[test]
fn missing_dataset_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let err = run(&config(dir.path(), dir.path().join("absent.csv"))).unwrap_err();
    assert!(matches!(err, PipelineError::Io(IoError::FileNotFound { .. })));
    assert!(!dir.path().join("artifacts").exists());
}
