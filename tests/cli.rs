// End-to-end checks of the `syntest` binary.

mod common;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

use common::{bundled_root, Scratch};

fn syntest() -> Command {
    let mut cmd = Command::cargo_bin("syntest").unwrap();
    cmd.env_remove("SYNTEST_PATH").env("NO_COLOR", "1");
    cmd
}

#[test]
fn run_without_testpath_is_fatal() {
    syntest()
        .arg("run")
        .assert()
        .code(2)
        .stderr(contains("testpath").and(contains("SYNTEST_PATH")));
}

#[test]
fn empty_environment_variable_counts_as_unset() {
    syntest()
        .env("SYNTEST_PATH", "")
        .arg("run")
        .assert()
        .code(2)
        .stderr(contains("syntest::config::unset").and(contains("SYNTEST_PATH")));
}

#[test]
fn run_passes_the_bundled_corpus() {
    syntest()
        .arg("run")
        .arg("--testpath")
        .arg(bundled_root())
        .arg("--no-color")
        .assert()
        .success()
        .stdout(
            contains("PASS: compiler-fixtures/syntax/balanced")
                .and(contains("total 10, passed 10, failed 0, skipped 0")),
        );
}

#[test]
fn redirected_output_has_no_color_codes() {
    let scratch = Scratch::new()
        .file("compiler-fixtures/ok.sx", "(define x 1)\n")
        .file("compiler-fixtures/wrong.sx", "()\n");
    let output = syntest()
        .env_remove("NO_COLOR")
        .env("TERM", "xterm-256color")
        .arg("run")
        .arg("--testpath")
        .arg(scratch.root())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stdout.contains(&0x1b));
    assert!(!output.stderr.contains(&0x1b));
    assert!(String::from_utf8_lossy(&output.stdout).contains("PASS: compiler-fixtures/ok"));
}

#[test]
fn environment_variable_supplies_the_testpath() {
    syntest()
        .env("SYNTEST_PATH", bundled_root())
        .args(["run", "--no-color", "--filter", "declarations"])
        .assert()
        .success()
        .stdout(contains("passed 2").and(contains("skipped 8")));
}

#[test]
fn missing_corpus_is_fatal() {
    let scratch = Scratch::new().dir("unrelated");
    syntest()
        .arg("run")
        .arg("--testpath")
        .arg(scratch.root())
        .assert()
        .code(2)
        .stderr(contains("syntest::corpus::missing"));
}

#[test]
fn mismatch_fails_the_run() {
    let scratch = Scratch::new()
        .file("compiler-fixtures/ok.sx", "(define x 1)\n")
        .file(
            "compiler-fixtures/types/mismatch.sx",
            "(define x 1)\n// ----\n// TypeError: Invalid type\n",
        );
    syntest()
        .arg("run")
        .arg("--testpath")
        .arg(scratch.root())
        .args(["--no-color", "--diff"])
        .assert()
        .code(1)
        .stdout(contains("PASS: compiler-fixtures/ok"))
        .stderr(
            contains("FAIL: compiler-fixtures/types/mismatch")
                .and(contains("Test expectation mismatch."))
                .and(contains("+\tSuccess")),
        );
}

#[test]
fn json_output_is_machine_readable() {
    let output = syntest()
        .arg("run")
        .arg("--testpath")
        .arg(bundled_root())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["summary"]["passed"], 10);
    assert_eq!(value["results"].as_array().unwrap().len(), 10);
}

#[test]
fn list_prints_names_and_paths() {
    syntest()
        .arg("list")
        .arg("--testpath")
        .arg(bundled_root())
        .assert()
        .success()
        .stdout(
            contains("compiler-fixtures/warnings/nested/deep [")
                .and(contains("deep.sx]")),
        );
}

#[test]
fn analyze_prints_a_trailer() {
    let fixture = bundled_root().join("compiler-fixtures/declarations/duplicate_define.sx");
    syntest()
        .arg("analyze")
        .arg(fixture)
        .assert()
        .success()
        .stdout("// ----\n// DeclarationError: Identifier already declared.\n");
}

#[test]
fn analyze_reports_malformed_trailers() {
    let scratch = Scratch::new().file("bad.sx", "()\n// ----\nWarning: missing slashes\n");
    syntest()
        .arg("analyze")
        .arg(scratch.root().join("bad.sx"))
        .assert()
        .code(2)
        .stderr(contains("syntest::fixture::trailer"));
}
