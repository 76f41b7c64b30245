//! Integration tests for CLI commands.

use eventkv_core::CreateRequest;
use eventkv_store::{JsonFileStore, KvService, WriteOptions};
use std::process::Command;
use tempfile::TempDir;

fn create_test_data() -> (TempDir, String) {
    let temp_dir = TempDir::new().unwrap();
    let data_path = temp_dir.path().join("data.json");

    let service =
        KvService::new(JsonFileStore::open(&data_path, WriteOptions::default()).unwrap());
    for (key, value) in [("key1", "value1"), ("key2", "value3")] {
        service
            .create(&CreateRequest {
                key: key.to_string(),
                value: value.to_string(),
            })
            .unwrap();
    }
    service.update("key1", "value2").unwrap();
    service.delete("key2").unwrap();

    (temp_dir, data_path.to_string_lossy().to_string())
}

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_eventkv"))
        .args(args)
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    let success = output.status.success();

    (success, stdout, stderr)
}

#[test]
fn test_list_command() {
    let (_temp_dir, data_path) = create_test_data();

    let (success, stdout, _) = run_cli(&["list", &data_path]);
    assert!(success);
    assert!(stdout.contains("KEY"));
    assert!(stdout.contains("key1"));
    assert!(stdout.contains("live"));
    assert!(stdout.contains("deleted"));
}

#[test]
fn test_list_json() {
    let (_temp_dir, data_path) = create_test_data();

    let (success, stdout, _) = run_cli(&["list", &data_path, "--json"]);
    assert!(success);

    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["key"], "key1");
    assert_eq!(lines[0]["state"], "live");
    assert_eq!(lines[0]["events"], 2);
    assert_eq!(lines[0]["value"], "value2");
    assert_eq!(lines[1]["state"], "deleted");
    assert!(lines[1]["value"].is_null());
}

#[test]
fn test_get_command() {
    let (_temp_dir, data_path) = create_test_data();

    let (success, stdout, _) = run_cli(&["get", &data_path, "key1"]);
    assert!(success);
    assert_eq!(stdout, "value2\n");

    let (success, _, stderr) = run_cli(&["get", &data_path, "key2"]);
    assert!(!success);
    assert!(stderr.contains("deleted"));

    let (success, _, stderr) = run_cli(&["get", &data_path, "key3"]);
    assert!(!success);
    assert!(stderr.contains("does not exist"));
}

#[test]
fn test_history_command() {
    let (_temp_dir, data_path) = create_test_data();

    let (success, stdout, _) = run_cli(&["history", &data_path, "key2", "--json"]);
    assert!(success);
    assert_eq!(
        stdout.trim(),
        r#"[{"event":"create","value":"value3"},{"event":"delete","value":""}]"#
    );

    let (success, stdout, _) = run_cli(&["history", &data_path, "key1"]);
    assert!(success);
    assert!(stdout.contains("create  value1"));
    assert!(stdout.contains("update  value2"));
}

#[test]
fn test_missing_data_file() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.json");

    let (success, _, stderr) = run_cli(&["list", &missing.to_string_lossy()]);
    assert!(!success);
    assert!(stderr.contains("Failed to open data file"));
    assert!(!missing.exists());
}
