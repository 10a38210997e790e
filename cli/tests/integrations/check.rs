use crate::kaucher;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_cli_check_inline_constraints() {
    kaucher()
        .args(["check", "x * x - x", "x=1..5"])
        .args(["-c", "f in [0 .. 20]", "-c", "f in [0 .. 10]"])
        .assert()
        .success()
        .stdout(predicate::str::contains("satisfied"))
        .stdout(predicate::str::contains("violated"))
        .stdout(predicate::str::contains("1 of 2 constraints satisfied"))
        .stdout(predicate::str::contains("total weighted violation: 10"));
}

#[test]
fn test_cli_check_constraint_file() {
    let temp_dir = TempDir::new().unwrap();
    let constraints = temp_dir.path().join("shape.txt");
    fs::write(
        &constraints,
        r#"
# x * y grows in both inputs
∂f/∂x in [0 .. inf]
∂f/∂y in [0 .. inf], weight: 3
f in [0 .. 1], x in [0 .. 0.5]
"#,
    )
    .unwrap();

    kaucher()
        .args(["check", "x * y", "x=0..2", "y=0..1", "--constraints"])
        .arg(&constraints)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 of 3 constraints satisfied"));
}

#[test]
fn test_cli_check_json() {
    let output = kaucher()
        .args(["check", "x * x - x", "x=1..5", "-c", "f in [0 .. 10]", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["violation"], 10.0);
    assert_eq!(reports[0]["weighted_violation"], 10.0);
}

#[test]
fn test_cli_check_parse_error_points_at_file() {
    let temp_dir = TempDir::new().unwrap();
    let constraints = temp_dir.path().join("broken.txt");
    fs::write(&constraints, "f in [0 .. 1]\nf in [0 ..\n").unwrap();

    kaucher()
        .args(["check", "x", "x=0..1", "--constraints"])
        .arg(&constraints)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"))
        .stderr(predicate::str::contains("line 2"))
        .stderr(predicate::str::contains("broken.txt"));
}

#[test]
fn test_cli_check_requires_constraints() {
    kaucher()
        .args(["check", "x", "x=0..1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No constraints given"));
}

#[test]
fn test_cli_check_missing_file() {
    let temp_dir = TempDir::new().unwrap();

    kaucher()
        .args(["check", "x", "x=0..1", "--constraints"])
        .arg(temp_dir.path().join("absent.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}
