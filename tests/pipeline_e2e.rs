// End-to-end run against a stub phase server speaking the line-JSON wire.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;

use assert_cmd::Command;
use predicates::str::contains;

const CORPUS: &str = r#"name: e2e
sections:
  - name: answers
    tests:
      - name: right
        expr: "6 * 7"
        expected: 42
      - name: skipped
        expr: "1 / 0"
        expected: 0
"#;

/// A phase server that answers every request with 42.
const SERVER: &str = "#!/bin/sh
while read line; do
  echo '{\"result\": 42}'
done
";

fn write_executable(path: &str, content: &str) {
    fs::write(path, content).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn full_run_reports_pass_skip_and_summary() {
    let corpus = "tests/e2e_corpus.yaml";
    let server = "tests/e2e_server.sh";
    fs::write(corpus, CORPUS).unwrap();
    write_executable(server, SERVER);

    let mut cmd = Command::cargo_bin("verdict").unwrap();
    cmd.arg(format!("--server={}", server))
        .arg("--skip-test=e2e/answers/skipped")
        .arg(corpus);
    cmd.assert()
        .success()
        .stdout(contains("PASS: e2e/answers/right"))
        .stdout(contains("SKIP: e2e/answers/skipped"))
        .stdout(contains("passed 1"))
        .stdout(contains("skipped 1"));

    let _ = fs::remove_file(corpus);
    let _ = fs::remove_file(server);
}

#[test]
fn a_failing_unit_fails_the_process_but_not_the_report() {
    let corpus = "tests/e2e_fail_corpus.yaml";
    let server = "tests/e2e_fail_server.sh";
    fs::write(
        corpus,
        r#"name: e2e
sections:
  - name: answers
    tests:
      - name: wrong
        expr: "6 * 7"
        expected: 41
      - name: right
        expr: "6 * 7"
        expected: 42
"#,
    )
    .unwrap();
    write_executable(server, SERVER);

    let mut cmd = Command::cargo_bin("verdict").unwrap();
    cmd.arg(format!("--server={}", server)).arg(corpus);
    cmd.assert()
        .failure()
        .stderr(contains("FAIL: e2e/answers/wrong"))
        // The failing unit did not stop its sibling.
        .stdout(contains("PASS: e2e/answers/right"))
        .stdout(contains("failed 1"));

    let _ = fs::remove_file(corpus);
    let _ = fs::remove_file(server);
}
