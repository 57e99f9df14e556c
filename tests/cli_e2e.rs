//! End-to-end CLI tests for mattergram.
//!
//! These tests run the actual binary against a temporary input directory
//! and inspect the produced archive.
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use std::fs::{self, File};
use std::io::Read;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

const CONFIG: &str = r#"
[users]
user123 = "abc"
user456 = "def"
"#;

const EXPORT: &str = r#"{
  "name": "Test Chat",
  "type": "personal_chat",
  "id": 123456789,
  "messages": [
    {"id": 1, "type": "message", "date": "2022-03-15T06:06:11",
     "from": "A. B. Cexample", "from_id": "user123", "text": "Morning!"},
    {"id": 2, "type": "message", "date": "2022-03-15T06:07:51",
     "from": "D. E. Fexample", "from_id": "user456", "text": "Mornin'!",
     "reply_to_message_id": 1},
    {"id": 3, "type": "message", "date": "2022-03-15T06:09:31",
     "from": "A. B. Cexample", "from_id": "user123", "text": "Photo time",
     "photo": "photos/pic.jpg"}
  ]
}"#;

fn setup_input_dir() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("config.toml"), CONFIG).unwrap();
    fs::write(dir.path().join("result.json"), EXPORT).unwrap();
    fs::create_dir(dir.path().join("photos")).unwrap();
    fs::write(dir.path().join("photos").join("pic.jpg"), b"jpegdata").unwrap();
    dir
}

fn mattergram() -> Command {
    Command::cargo_bin("mattergram").expect("binary exists")
}

#[test]
fn test_basic_conversion() {
    let dir = setup_input_dir();
    let output = dir.path().join("out.zip");

    mattergram()
        .arg(dir.path())
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Done!"));

    let mut archive = zip::ZipArchive::new(File::open(&output).unwrap()).unwrap();
    let mut jsonl = String::new();
    archive
        .by_name("import.jsonl")
        .unwrap()
        .read_to_string(&mut jsonl)
        .unwrap();

    let lines: Vec<&str> = jsonl.lines().collect();
    assert_eq!(lines[0], r#"{"type":"version","version":1}"#);
    // Messages 1 (with nested reply 2) and 3.
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains(r#""type":"direct_post""#));
    assert!(lines[1].contains("Mornin'!"));

    let mut pic = Vec::new();
    archive
        .by_name("data/photos/pic.jpg")
        .unwrap()
        .read_to_end(&mut pic)
        .unwrap();
    assert_eq!(pic, b"jpegdata");
}

#[test]
fn test_conversation_log_flag() {
    let dir = setup_input_dir();
    let output = dir.path().join("out.zip");
    let log = dir.path().join("chat.log");

    mattergram()
        .arg(dir.path())
        .arg("-o")
        .arg(&output)
        .arg("--conversation-log")
        .arg(&log)
        .assert()
        .success();

    let content = fs::read_to_string(&log).unwrap();
    assert!(content.starts_with("CONVERSATION LOG LEGEND"));
    assert!(content.contains("[2022-03-15 06:06:11] @abc:\nMorning!"));
    assert!(content.contains("> @abc: Morning!"));
    assert!(content.contains("[PHOTO: pic.jpg]"));
}

#[test]
fn test_missing_input_dir() {
    mattergram()
        .arg("/nonexistent/path")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_missing_config_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("result.json"), EXPORT).unwrap();

    mattergram()
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_missing_export_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), CONFIG).unwrap();

    mattergram()
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("export"));
}

#[test]
fn test_invalid_export_json() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), CONFIG).unwrap();
    fs::write(dir.path().join("result.json"), "not json at all").unwrap();

    mattergram().arg(dir.path()).assert().failure();
}

#[test]
fn test_alternate_config_name() {
    let dir = setup_input_dir();
    fs::rename(
        dir.path().join("config.toml"),
        dir.path().join("custom.toml"),
    )
    .unwrap();
    let output = dir.path().join("out.zip");

    mattergram()
        .arg(dir.path())
        .arg("-o")
        .arg(&output)
        .arg("-c")
        .arg("custom.toml")
        .assert()
        .success();
    assert!(output.exists());
}

#[test]
fn test_channel_export_requires_import_target() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), CONFIG).unwrap();
    fs::write(
        dir.path().join("result.json"),
        r#"{"type": "private_supergroup", "messages": []}"#,
    )
    .unwrap();

    mattergram()
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("import_into"));
}

#[test]
fn test_missing_attachment_does_not_fail_run() {
    let dir = setup_input_dir();
    fs::remove_file(dir.path().join("photos").join("pic.jpg")).unwrap();
    let output = dir.path().join("out.zip");

    mattergram()
        .arg(dir.path())
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let archive = zip::ZipArchive::new(File::open(&output).unwrap()).unwrap();
    assert!(!archive.file_names().any(|n| n.ends_with("pic.jpg")));
}

#[test]
fn test_help_shows_usage() {
    mattergram()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("INPUT_DIR"))
        .stdout(predicate::str::contains("--conversation-log"));
}
