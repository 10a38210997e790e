mod bound;
mod check;
mod derive;

use assert_cmd::Command;

pub fn kaucher() -> Command {
    Command::cargo_bin("kaucher").unwrap()
}

#[test]
fn test_cli_help_lists_commands() {
    kaucher()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("bound"))
        .stdout(predicates::str::contains("check"))
        .stdout(predicates::str::contains("derive"));
}
