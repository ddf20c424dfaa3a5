//! Integration tests for the w65c02-run CLI.

use anyhow as _;
use serde_json as _;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tracing as _;
use tracing_subscriber as _;
use w65c02_core as _;

/// LDA #'o' ; STA $F001 ; LDA #'k' ; STA $F001 ; STP
const HELLO: &[u8] = &[
    0xA9, b'o', 0x8D, 0x01, 0xF0, 0xA9, b'k', 0x8D, 0x01, 0xF0, 0xDB,
];

/// Copies stdin to stdout through the console ports, then stops.
const ECHO: &[u8] = &[
    0xCB, 0xAD, 0x04, 0xF0, 0xC9, 0xFF, 0xF0, 0x0B, 0xAD, 0x05, 0xF0, 0x8D, 0x01, 0xF0, 0x9C,
    0x04, 0xF0, 0x80, 0xED, 0xDB,
];

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_w65c02-run"))
}

fn write_image(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn run_with_input(args: &[&str], input: &[u8]) -> Output {
    let mut child = Command::new(binary_path())
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run w65c02-run");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input)
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn runs_image_until_stp() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = write_image(temp_dir.path(), "hello.bin", HELLO);

    let output = run_with_input(&[image.to_str().unwrap()], b"");

    assert!(output.status.success());
    assert_eq!(output.stdout, b"ok");
}

#[test]
fn trace_file_has_one_line_per_access() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = write_image(temp_dir.path(), "hello.bin", HELLO);
    let trace = temp_dir.path().join("bus.log");

    let output = run_with_input(
        &[image.to_str().unwrap(), "--trace", trace.to_str().unwrap()],
        b"",
    );

    assert!(output.status.success());
    let text = fs::read_to_string(&trace).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 13);
    assert_eq!(lines[0], "0000 r A9");
    assert_eq!(lines[1], "0001 r 6F");
    assert_eq!(lines[4], "0004 r F0");
    assert_eq!(lines[5], "F001 W 6F");
    assert_eq!(lines[12], "000A r DB");
}

#[test]
fn trace_dash_goes_to_stderr() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = write_image(temp_dir.path(), "hello.bin", HELLO);

    let output = run_with_input(&[image.to_str().unwrap(), "--trace", "-"], b"");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("0000 r A9"));
    assert!(stderr.contains("F001 W 6B"));
}

#[test]
fn echo_program_reads_stdin() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = write_image(temp_dir.path(), "echo.bin", ECHO);

    let output = run_with_input(
        &[
            image.to_str().unwrap(),
            "--load",
            "0x0200",
            "--entry",
            "$0200",
        ],
        b"echo me",
    );

    assert!(output.status.success());
    assert_eq!(output.stdout, b"echo me");
}

#[test]
fn config_file_sets_load_and_entry() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = write_image(temp_dir.path(), "hello.bin", HELLO);
    let config = temp_dir.path().join("machine.json");
    fs::write(
        &config,
        r#"{ "load_address": 1024, "entry": { "address": 1024 } }"#,
    )
    .unwrap();

    let output = run_with_input(
        &[image.to_str().unwrap(), "--config", config.to_str().unwrap()],
        b"",
    );

    assert!(output.status.success());
    assert_eq!(output.stdout, b"ok");
}

#[test]
fn missing_image_fails_with_message() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("absent.bin");

    let output = run_with_input(&[missing.to_str().unwrap()], b"");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read image"));
}

#[test]
fn invalid_config_fails_with_message() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = write_image(temp_dir.path(), "hello.bin", HELLO);
    let config = temp_dir.path().join("bad.json");
    fs::write(&config, "{ not json").unwrap();

    let output = run_with_input(
        &[image.to_str().unwrap(), "--config", config.to_str().unwrap()],
        b"",
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid config"));
}

#[test]
fn help_prints_usage() {
    let output = run_with_input(&["--help"], b"");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Usage: w65c02-run"));
}
