//! End-to-end tests for the `validate` binary
//!
//! Each test writes a file, runs the built binary on it and checks the
//! output streams and exit code.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn validate(path: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_validate"))
        .arg(path)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run validate")
}

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn valid_file_prints_ok() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "ok.js", "a = 1\nb = 2\n");

    let output = validate(&path);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "OK\n");
    assert!(output.stderr.is_empty());
}

#[test]
fn syntax_error_exits_one() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.js", "a = 1 b = 2");

    let output = validate(&path);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let expected = format!("Syntax error at {}:1:7: ", path.display());
    assert!(stderr.starts_with(&expected), "stderr was {:?}", stderr);
}

#[test]
fn end_of_input_error_position() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "open.js", "function f() { ");

    let output = validate(&path);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(":1:16: Unexpected end of input"), "stderr was {:?}", stderr);
}

#[test]
fn missing_file_exits_two() {
    let dir = TempDir::new().unwrap();
    let output = validate(&dir.path().join("absent.js"));
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Internal or IO error: "), "stderr was {:?}", stderr);
}

#[test]
fn deep_nesting_exits_two() {
    let dir = TempDir::new().unwrap();
    let source = format!("x = {}1{};\n", "[".repeat(5000), "]".repeat(5000));
    let path = write(&dir, "deep.js", &source);

    let output = validate(&path);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Nesting too deep at "), "stderr was {:?}", stderr);
}

#[test]
fn module_files_accept_exports() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "lib.mjs", "export const answer = 42;\n");
    assert_eq!(validate(&path).status.code(), Some(0));

    let path = write(&dir, "lib.js", "export const answer = 42;\n");
    assert_eq!(validate(&path).status.code(), Some(1));
}

#[test]
fn missing_argument_is_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_validate"))
        .output()
        .expect("failed to run validate");
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}
