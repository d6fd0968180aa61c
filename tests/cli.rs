//! Drive the compiled binary against scratch directories.

use std::fmt::Write as _;
use std::path::Path;
use std::process::Command;

use qoe_io::schema::{FEATURE_COLUMNS, REQUIRED_COLUMNS};

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_qoe-repro"))
}

fn write_window(path: &Path, n_rows: usize) {
    let mut out = String::new();
    let header: Vec<&str> = FEATURE_COLUMNS.iter().chain(&REQUIRED_COLUMNS).copied().collect();
    writeln!(out, "{}", header.join(",")).unwrap();
    for i in 0..n_rows {
        let band = i % 3;
        let features: Vec<String> = (0..FEATURE_COLUMNS.len())
            .map(|f| format!("{}", band * 10 + (i * 7 + f) % 5))
            .collect();
        let ping = [20, 70, 180][band] + i % 7;
        writeln!(out, "{},{ping},{},exp_{}", features.join(","), 5 - band * 2, i / 40).unwrap();
    }
    std::fs::write(path, out).unwrap();
}

#[test]
fn validate_reports_missing_data_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = bin()
        .args(["--quiet", "validate", "--json", "--data-dir"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["all_passed"], false);
    assert_eq!(report["checks"].as_array().unwrap().len(), 4);
}

#[test]
fn validate_prints_text_report() {
    let dir = tempfile::tempdir().unwrap();
    let output = bin()
        .args(["--quiet", "validate", "--data-dir"])
        .arg(dir.path())
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("PAPER REPRODUCTION VALIDATION"));
    assert!(stdout.contains("Some checks failed"));
}

#[test]
fn run_prints_summary_json() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("w.csv");
    write_window(&data, 240);
    let artifacts = dir.path().join("artifacts");

    let output = bin()
        .args(["--quiet", "--threads", "2", "run", "--model", "DT", "--data"])
        .arg(&data)
        .arg("--artifacts")
        .arg(&artifacts)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["sampled_rows"], 240);
    assert_eq!(summary["test_size"], 48);
    assert_eq!(summary["model"], "DT");
    assert!(artifacts.join("figures").is_dir());
}

#[test]
fn run_fails_on_unknown_label_source() {
    let dir = tempfile::tempdir().unwrap();
    let output = bin()
        .args(["--quiet", "run", "--label-source", "mood", "--data-dir"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
}
