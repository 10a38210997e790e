use crate::kaucher;
use predicates::prelude::*;

#[test]
fn test_cli_bound_cancels_repeated_variable() {
    kaucher()
        .args(["bound", "x - x + 2 * y", "x=-3..3", "y=0..1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[0 .. 2]"));
}

#[test]
fn test_cli_bound_json() {
    let output = kaucher()
        .args(["bound", "x * x - x", "x=1..5", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["approximation"], "outer");
    assert_eq!(report["bound"]["lower"], 0.0);
    assert_eq!(report["bound"]["upper"], 20.0);
    assert!(report.get("nodes").is_none());
}

#[test]
fn test_cli_bound_inner_json() {
    let output = kaucher()
        .args(["bound", "x * x - x", "x=-1..1", "--inner", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["approximation"], "inner");
    assert_eq!(report["bound"]["lower"], 0.0);
    assert_eq!(report["bound"]["upper"], 0.0);
}

#[test]
fn test_cli_bound_nodes_table() {
    kaucher()
        .args(["bound", "x * x - x", "x=1..5", "--nodes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Expression"))
        .stdout(predicate::str::contains("(x * x)"))
        .stdout(predicate::str::contains("[1 .. 25]"))
        .stdout(predicate::str::contains("[0 .. 20]"));
}

#[test]
fn test_cli_bound_point_range() {
    kaucher()
        .args(["bound", "x + y", "x=2", "y=0..1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[2 .. 3]"));
}

#[test]
fn test_cli_bound_missing_range() {
    kaucher()
        .args(["bound", "x + y", "x=0..1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No range given for variable 'y'"));
}

#[test]
fn test_cli_bound_reversed_range() {
    kaucher()
        .args(["bound", "x", "x=3..1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lower bound exceeds upper bound"));
}

#[test]
fn test_cli_bound_malformed_range_argument() {
    kaucher()
        .args(["bound", "x", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected name=lo..hi"));

    kaucher()
        .args(["bound", "x", "x=0..abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid bound 'abc'"));
}

#[test]
fn test_cli_bound_parse_error() {
    kaucher()
        .args(["bound", "x + * y", "x=0..1", "y=0..1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"))
        .stderr(predicate::str::contains("<expression>"));
}

#[test]
fn test_cli_bound_unsupported_symbol() {
    kaucher()
        .args(["bound", "erf(x)", "x=0..1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported symbol"));
}
