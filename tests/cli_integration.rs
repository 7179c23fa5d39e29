//! CLI Integration Tests
//!
//! These tests verify that the CLI commands work correctly end-to-end.
//! They test the actual binary behavior, not just the library.
//!
//! Run with:
//! ```bash
//! cargo test --test cli_integration
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

/// Run radix command and return (stdout, stderr, success)
fn run_radix(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_radix"))
        .args(args)
        .output()
        .expect("Failed to execute radix");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

fn write_entries(dir: &Path, name: &str, json: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, json).unwrap();
    path
}

fn parse(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout.trim()).expect("stdout should be JSON")
}

// ============================================================================
// Hashing
// ============================================================================

#[test]
fn test_cli_hash_matches_library() {
    let dir = tempdir().unwrap();
    let file = write_entries(dir.path(), "a.json", r#"{"cat": "A", "car": "B", "dog": "C"}"#);

    let (stdout, _stderr, success) = run_radix(&["hash", file.to_str().unwrap()]);
    assert!(success, "hash should succeed");

    let mut tree = radix_merkle::RadixTree::new();
    tree.put("cat", "A".to_string());
    tree.put("car", "B".to_string());
    tree.put("dog", "C".to_string());

    let json = parse(&stdout);
    assert_eq!(json["root_hash"], tree.root_hash().to_hex());
    assert_eq!(json["len"], 3);
    assert_eq!(json["parts"], 2);
}

#[test]
fn test_cli_hash_empty_object_is_zero() {
    let dir = tempdir().unwrap();
    let file = write_entries(dir.path(), "empty.json", "{}");

    let (stdout, _stderr, success) = run_radix(&["hash", file.to_str().unwrap()]);
    assert!(success);
    assert_eq!(parse(&stdout)["root_hash"], "0".repeat(64));
}

#[test]
fn test_cli_parts_change_hash() {
    let dir = tempdir().unwrap();
    let file = write_entries(dir.path(), "a.json", r#"{"cat": "A", "car": "B"}"#);
    let path = file.to_str().unwrap();

    let (nibbles, _, ok1) = run_radix(&["hash", path]);
    let (bits, _, ok2) = run_radix(&["--parts", "8", "hash", path]);
    assert!(ok1 && ok2);
    assert_ne!(parse(&nibbles)["root_hash"], parse(&bits)["root_hash"]);
}

#[test]
fn test_cli_invalid_parts_fails() {
    let dir = tempdir().unwrap();
    let file = write_entries(dir.path(), "a.json", r#"{"cat": "A"}"#);

    let (_stdout, stderr, success) = run_radix(&["--parts", "3", "hash", file.to_str().unwrap()]);
    assert!(!success, "3 parts per byte should be rejected");
    assert!(stderr.contains("Invalid digit split"));
}

#[test]
fn test_cli_config_file() {
    let dir = tempdir().unwrap();
    let file = write_entries(dir.path(), "a.json", r#"{"cat": "A"}"#);
    let config = write_entries(dir.path(), "config.json", r#"{"parts": 4}"#);

    let (stdout, _stderr, success) = run_radix(&[
        "--config",
        config.to_str().unwrap(),
        "hash",
        file.to_str().unwrap(),
    ]);
    assert!(success);
    assert_eq!(parse(&stdout)["parts"], 4);
}

// ============================================================================
// Lookup and listing
// ============================================================================

#[test]
fn test_cli_get() {
    let dir = tempdir().unwrap();
    let file = write_entries(dir.path(), "a.json", r#"{"cat": "A", "car": "B"}"#);
    let path = file.to_str().unwrap();

    let (stdout, _stderr, success) = run_radix(&["get", path, "cat"]);
    assert!(success);
    let json = parse(&stdout);
    assert_eq!(json["found"], true);
    assert_eq!(json["value"], "A");

    let (stdout, _stderr, _) = run_radix(&["get", path, "ca"]);
    assert_eq!(parse(&stdout)["found"], false);
}

#[test]
fn test_cli_list_from() {
    let dir = tempdir().unwrap();
    let file = write_entries(
        dir.path(),
        "a.json",
        r#"{"dog": "C", "cat": "A", "car": "B", "bee": "D"}"#,
    );

    let (stdout, _stderr, success) = run_radix(&[
        "list",
        file.to_str().unwrap(),
        "--from",
        "car",
        "--exclusive",
    ]);
    assert!(success);
    let keys: Vec<_> = parse(&stdout)["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["key"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(keys, vec!["cat", "dog"]);
}

#[test]
fn test_cli_dump_text() {
    let dir = tempdir().unwrap();
    let file = write_entries(dir.path(), "a.json", r#"{"cat": "A"}"#);

    let (stdout, _stderr, success) = run_radix(&["-f", "text", "dump", file.to_str().unwrap()]);
    assert!(success);
    assert!(stdout.starts_with("<Radix size:1>"));
    assert!(stdout.contains("=> \"A\""));
}

// ============================================================================
// Comparison
// ============================================================================

#[test]
fn test_cli_compare() {
    let dir = tempdir().unwrap();
    let old = write_entries(dir.path(), "old.json", r#"{"cat": "A", "car": "B", "dog": "C"}"#);
    let new = write_entries(dir.path(), "new.json", r#"{"cat": "A", "car": "B2", "dog": "C"}"#);

    let (stdout, _stderr, success) =
        run_radix(&["compare", old.to_str().unwrap(), new.to_str().unwrap()]);
    assert!(success);
    let json = parse(&stdout);
    assert_eq!(json["equal"], false);
    assert_eq!(json["modified"], 1);
    assert_eq!(json["entries"][0]["key"], "car");

    let (stdout, _stderr, _) = run_radix(&["compare", old.to_str().unwrap(), old.to_str().unwrap()]);
    assert_eq!(parse(&stdout)["equal"], true);
}

#[test]
fn test_cli_missing_file_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.json");

    let (_stdout, stderr, success) = run_radix(&["hash", missing.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("Failed to read"));
}
