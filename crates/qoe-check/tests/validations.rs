//! Full validation runs against scratch data directories.

use std::fmt::Write as _;
use std::path::Path;

use qoe_check::{
    default_requirements, run_all_validations, Requirement, Status, ValidationConfig,
};
use qoe_io::schema::{FEATURE_COLUMNS, REQUIRED_COLUMNS};
use qoe_io::WindowCatalog;

fn window_csv(n_rows: usize) -> String {
    let mut out = String::new();
    let header: Vec<&str> = FEATURE_COLUMNS.iter().chain(&REQUIRED_COLUMNS).copied().collect();
    writeln!(out, "{}", header.join(",")).unwrap();
    for i in 0..n_rows {
        let features: Vec<String> = (0..FEATURE_COLUMNS.len()).map(|f| (i * f).to_string()).collect();
        writeln!(out, "{},{},{},exp{}", features.join(","), i * 7 % 150, 1 + i % 5, i % 3).unwrap();
    }
    out
}

fn populate(dir: &Path, skip: Option<u32>) {
    for (size, path) in WindowCatalog::rooted_at(dir).iter() {
        if Some(size) != skip {
            std::fs::write(path, window_csv(20)).unwrap();
        }
    }
}

fn compiled_requirements() -> Vec<Requirement> {
    default_requirements()
        .into_iter()
        .filter(|r| match r {
            Requirement::Model(kind) => kind.is_compiled(),
            _ => true,
        })
        .collect()
}

#[test]
fn complete_data_dir_passes_every_check() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path(), None);
    let config = ValidationConfig::new()
        .with_data_dir(dir.path())
        .with_requirements(compiled_requirements());

    let report = run_all_validations(&config);
    let names: Vec<&str> = report.checks.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Environment", "Datasets", "Data Structure", "Model Creation"]);
    assert!(report.all_passed, "{report}");
    assert!(report.to_string().contains("ALL CHECKS PASSED"));
}

#[test]
fn missing_window_fails_only_datasets() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path(), Some(5));
    let config = ValidationConfig::new()
        .with_data_dir(dir.path())
        .with_requirements(compiled_requirements());

    let report = run_all_validations(&config);
    assert!(!report.all_passed);
    assert_eq!(report.check("Datasets").unwrap().status, Status::Failed);
    assert_eq!(report.check("Data Structure").unwrap().status, Status::Passed);
    assert_eq!(report.check("Model Creation").unwrap().status, Status::Passed);
}

#[test]
fn structure_fails_without_required_column() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path(), None);
    let odd = dir.path().join("odd.csv");
    std::fs::write(&odd, "ping,exp_id\n10,a\n").unwrap();
    let config = ValidationConfig::new()
        .with_data_dir(dir.path())
        .with_structure_file(&odd)
        .with_requirements(compiled_requirements());

    let report = run_all_validations(&config);
    assert_eq!(report.check("Data Structure").unwrap().status, Status::Failed);
    assert_eq!(report.check("Datasets").unwrap().status, Status::Passed);
    assert!(!report.all_passed);
}

#[test]
fn report_serializes_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = ValidationConfig::new()
        .with_data_dir(dir.path())
        .with_requirements(compiled_requirements());
    let report = run_all_validations(&config);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["all_passed"], false);
    assert_eq!(json["checks"][1]["name"], "Datasets");
    assert_eq!(json["checks"][1]["status"], "failed");
    assert_eq!(json["checks"][1]["details"][0]["mark"], "fail");
}
