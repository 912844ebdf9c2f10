//! Integration tests for the papercache binary

use chrono::{Duration, Utc};
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_papercache"))
}

fn write_entry(dir: &std::path::Path, key: &str, result: &str, age_days: i64, version: &str) {
    let json = serde_json::json!({
        "result": result,
        "timestamp": (Utc::now() - Duration::days(age_days)).to_rfc3339(),
        "version": version,
    });
    fs::write(dir.join(format!("{key}.json")), json.to_string()).unwrap();
}

#[test]
fn test_stats_reports_entry_breakdown() {
    let temp = TempDir::new().unwrap();
    write_entry(temp.path(), "fresh", "valid analysis", 0, "4.0");
    write_entry(temp.path(), "old", "stale analysis", 10, "4.0");

    let output = Command::new(binary_path())
        .arg(temp.path())
        .output()
        .expect("Failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total entries:   2"));
    assert!(stdout.contains("valid:         1"));
    assert!(stdout.contains("stale:         1"));
}

#[test]
fn test_sweep_removes_invalid_entries() {
    let temp = TempDir::new().unwrap();
    write_entry(temp.path(), "fresh", "valid analysis", 0, "4.0");
    write_entry(temp.path(), "legacy", "old schema", 0, "3.0");
    write_entry(temp.path(), "expired", "very old", 45, "4.0");

    let output = Command::new(binary_path())
        .args(["--sweep"])
        .arg(temp.path())
        .output()
        .expect("Failed to run binary");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("examined 3 entries, removed 2"));
    assert!(temp.path().join("fresh.json").exists());
    assert!(!temp.path().join("legacy.json").exists());
    assert!(!temp.path().join("expired.json").exists());
}

#[test]
fn test_clear_removes_everything() {
    let temp = TempDir::new().unwrap();
    write_entry(temp.path(), "a", "one", 0, "4.0");
    write_entry(temp.path(), "b", "two", 0, "4.0");

    let output = Command::new(binary_path())
        .args(["--clear"])
        .arg(temp.path())
        .output()
        .expect("Failed to run binary");

    assert!(output.status.success());
    assert!(!temp.path().join("a.json").exists());
    assert!(!temp.path().join("b.json").exists());
}

#[test]
fn test_fingerprint_prints_stable_key() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("paper.pdf");
    fs::write(&file, b"pdf bytes").unwrap();

    let run = || {
        let output = Command::new(binary_path())
            .arg("--fingerprint")
            .arg(&file)
            .output()
            .expect("Failed to run binary");
        assert!(output.status.success());
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    };

    let key = run();
    assert_eq!(key.len(), 64);
    assert!(key.bytes().all(|b| b.is_ascii_hexdigit()));
    assert_eq!(key, run());
}

#[test]
fn test_conflicting_actions_exit_code() {
    let output = Command::new(binary_path())
        .args(["--sweep", "--clear"])
        .output()
        .expect("Failed to run binary");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Action conflict"));
}
