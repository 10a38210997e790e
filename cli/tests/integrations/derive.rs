use crate::kaucher;

#[test]
fn test_cli_derive_drops_independent_terms() {
    kaucher()
        .args(["derive", "3 * x + sin(y)", "x"])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_cli_derive_product() {
    kaucher()
        .args(["derive", "x * y", "x"])
        .assert()
        .success()
        .stdout("y\n");
}

#[test]
fn test_cli_derive_higher_order() {
    kaucher()
        .args(["derive", "x * y", "x", "--order", "2"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn test_cli_derive_rejects_symbolic_exponent() {
    kaucher()
        .args(["derive", "x ^ y", "x"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Unsupported exponent"));
}
