use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("cardy").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Document-grounded assistant"));
}

#[test]
fn test_cli_serve_help() {
    let mut cmd = Command::cargo_bin("cardy").unwrap();
    cmd.arg("serve").arg("--help").assert().success().stdout(predicate::str::contains("port"));
}

#[test]
fn test_cli_ingest_requires_project() {
    let mut cmd = Command::cargo_bin("cardy").unwrap();
    cmd.arg("ingest")
        .arg("somefile.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--project"));
}
