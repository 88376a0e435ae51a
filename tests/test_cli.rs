//! Integration tests for the rpn binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn rpn() -> Command {
    let mut cmd = Command::cargo_bin("rpn").unwrap();
    cmd.env_remove("RPN_IFMT")
        .env_remove("RPN_OFMT")
        .env_remove("RPN_PRECISION")
        .env_remove("RPN_VERBOSE");
    cmd
}

#[test]
fn test_expressions_share_a_stack() {
    rpn()
        .args(["--norc", "-e", "3 4", "+ p"])
        .assert()
        .success()
        .stdout("7.0\n");
}

#[test]
fn test_error_goes_to_stderr() {
    rpn()
        .args(["-e", "+", "1 p"])
        .assert()
        .success()
        .stdout("1.0\n")
        .stderr(predicate::str::contains("Less than 2 element(s) on stack"));
}

#[test]
fn test_verbose_shows_cause() {
    rpn()
        .args(["-v", "-e", "1 0 /"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Cannot apply /: "));
}

#[test]
fn test_stdin_lines() {
    rpn()
        .write_stdin("2 3\n^ p\n")
        .assert()
        .success()
        .stdout("8.0\n");
}

#[test]
fn test_script_file_with_comments() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# setup").unwrap();
    writeln!(file, "6 'x' s  # keep six").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "'x' l 7 * p").unwrap();
    writeln!(file, "'#' p").unwrap();
    rpn()
        .arg(file.path())
        .assert()
        .success()
        .stdout("42.0\n")
        .stderr(predicate::str::contains("line 5: Cannot convert #"));
}

#[test]
fn test_missing_file_fails() {
    rpn()
        .arg("/nonexistent/script.rpn")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error reading"));
}

#[test]
fn test_env_output_format() {
    rpn()
        .env("RPN_OFMT", "i")
        .args(["-e", "7 2 / p"])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_missing_xclip_is_reported() {
    let empty = tempfile::tempdir().unwrap();
    rpn()
        .env("PATH", empty.path())
        .args(["-e", "'+' l", "1 p"])
        .assert()
        .success()
        .stdout("1.0\n")
        .stderr(predicate::str::contains("Cannot run xclip"));
}

#[test]
fn test_constant_message_names_value() {
    rpn()
        .args(["-e", "1 1 = 'A' s", "1 1 = 'A' s"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Attempting to assign True to constant register 'A'",
        ));
}

#[test]
fn test_unknown_flag() {
    rpn()
        .arg("--bogus")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized argument: --bogus"));
}

#[test]
fn test_version() {
    rpn()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("rpn-"));
}

#[test]
fn test_dump_lists_lexemes() {
    rpn()
        .args(["-D", "-e", "1 +"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[groups]"))
        .stdout(predicate::str::contains("number\t'1'\tNone"))
        .stdout(predicate::str::contains("operator\timmediate\t'+'\t2"));
}

#[test]
fn test_grammar() {
    rpn()
        .arg("-g")
        .assert()
        .success()
        .stdout(predicate::str::contains("number"));
}

#[test]
fn test_help_lists_operators() {
    rpn()
        .args(["-e", "h"])
        .assert()
        .success()
        .stderr(predicate::str::contains("operators:"));
}
