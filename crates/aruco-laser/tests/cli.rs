#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;

fn generator() -> Command {
    Command::cargo_bin("aruco-laser").unwrap()
}

#[test]
fn generates_sheet_and_prints_summary() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("markers.pdf");
    let report = dir.path().join("markers.json");

    generator()
        .args(["--dict", "4X4_50", "-r", "0", "9", "-s", "12", "--spacing", "15"])
        .arg("-o")
        .arg(&output)
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generating ArUco Markers"))
        .stdout(predicate::str::contains("Marker size:      12.0mm × 12.0mm"))
        .stdout(predicate::str::contains("IDs:              [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]"))
        .stdout(predicate::str::contains("✓ Generated 10 markers in"));

    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["marker_count"], 10);
}

#[test]
fn out_of_range_id_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("bad.pdf");

    generator()
        .args(["--dict", "4X4_50", "-i", "3", "50"])
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(
            "Error: Marker IDs must be between 0 and 49 for 4X4_50",
        ));
    assert!(!output.exists());
}

#[test]
fn negative_id_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    generator()
        .args(["-i", "-1"])
        .arg("-o")
        .arg(dir.path().join("neg.pdf"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("(got -1)"));
}

#[test]
fn negative_lengths_fail_without_output() {
    let dir = tempfile::tempdir().unwrap();
    for args in [["--size=-5"], ["--border=-1"], ["--spacing=-3"]] {
        let output = dir.path().join("neg.pdf");
        generator()
            .args(["-i", "0"])
            .args(args)
            .arg("-o")
            .arg(&output)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Generated").not())
            .stderr(predicate::str::contains("must be a finite, non-negative length"));
        assert!(!output.exists());
    }
}

#[test]
fn explicit_grid_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    generator()
        .args(["-r", "0", "23", "--nrows", "4", "--ncols", "6", "--no-labels", "--page-size", "letter"])
        .arg("-o")
        .arg(dir.path().join("grid.pdf"))
        .assert()
        .success()
        .stdout(predicate::str::contains("4 rows × 6 cols (24 markers per page)"))
        .stdout(predicate::str::contains("Page size:        letter"))
        .stdout(predicate::str::contains("Show labels:      No"));
}

#[test]
fn unknown_dictionary_is_a_usage_error() {
    generator()
        .args(["--dict", "9X9_1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("9X9_1"));
}

#[test]
fn batch_driver_writes_catalog() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("aruco-laser-examples")
        .unwrap()
        .arg("--output-dir")
        .arg(dir.path())
        .arg("--generator")
        .arg(env!("CARGO_BIN_EXE_aruco-laser"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed: 25/25 successful"));

    for name in [
        "01_standard_10mm_with_labels.pdf",
        "17_7x7_dictionary_sample.pdf",
        "25_production_compact.pdf",
    ] {
        assert!(dir.path().join(name).is_file(), "{name} missing");
    }
}

#[test]
fn batch_driver_reports_missing_generator() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("aruco-laser-examples")
        .unwrap()
        .arg("--output-dir")
        .arg(dir.path())
        .arg("--generator")
        .arg(dir.path().join("missing-generator"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Completed: 0/25 successful"));
}

#[test]
fn previews_need_documents() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("aruco-laser-previews")
        .unwrap()
        .arg("--input-dir")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no PDF files"));
}
