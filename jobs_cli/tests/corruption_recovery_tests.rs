//! Corruption recovery tests for the jobs binary.
//!
//! These tests verify the system can handle:
//! - Corrupted player records
//! - Corrupted journal lines
//! - Records from older versions with missing fields
//! - Concurrent processes sharing one data directory

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::thread;
use tempfile::TempDir;

const CONFIG: &str = r#"
[jobs.miner]
name = "Miner"
color = "GRAY"

[jobs.miner.xp.break]
stone = 1
diamond_ore = 50
"#;

const PLAYER: &str = "2d7f4e0a-9c1b-4b3e-a5d6-7e8f9a0b1c2d";

fn setup_test_dir() -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, CONFIG).expect("Failed to write config");
    (temp_dir, config_path)
}

fn cli(data_dir: &Path, config_path: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jobs"));
    cmd.arg("--config")
        .arg(config_path)
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn write_player(data_dir: &Path, player: &str, contents: &str) -> PathBuf {
    let players = data_dir.join("players");
    fs::create_dir_all(&players).unwrap();
    let path = players.join(format!("{}.json", player));
    fs::write(&path, contents).expect("Failed to write player record");
    path
}

#[test]
fn test_corrupted_player_record() {
    let (temp_dir, config_path) = setup_test_dir();
    let data_dir = temp_dir.path().join("data");
    let path = write_player(&data_dir, PLAYER, "{ invalid json }}}}");

    // Play continues on a fresh record and the next save replaces the file
    cli(&data_dir, &config_path)
        .args(["act", "--player", PLAYER, "--material", "stone"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+1 Miner XP"))
        .stderr(predicate::str::contains("Unable to load job data"));

    let record: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(record["jobs"]["miner"]["total_xp"], 1);
}

#[test]
fn test_corrupted_record_on_join_is_not_overwritten() {
    let (temp_dir, config_path) = setup_test_dir();
    let data_dir = temp_dir.path().join("data");
    let path = write_player(&data_dir, PLAYER, "{ invalid json");

    cli(&data_dir, &config_path)
        .args(["join", "--player", PLAYER])
        .assert()
        .success()
        .stdout(predicate::str::contains("using defaults"));

    assert_eq!(fs::read_to_string(&path).unwrap(), "{ invalid json");
}

#[test]
fn test_record_with_missing_fields() {
    let (temp_dir, config_path) = setup_test_dir();
    let data_dir = temp_dir.path().join("data");
    write_player(
        &data_dir,
        PLAYER,
        &format!(r#"{{"player_id":"{}","jobs":{{"miner":{{"current_xp":5}}}}}}"#, PLAYER),
    );

    // Missing level defaults to 1
    cli(&data_dir, &config_path)
        .args(["status", "--player", PLAYER])
        .assert()
        .success()
        .stdout(predicate::str::contains("5/7 XP"));
}

#[test]
fn test_record_with_level_zero_is_normalized() {
    let (temp_dir, config_path) = setup_test_dir();
    let data_dir = temp_dir.path().join("data");
    write_player(
        &data_dir,
        PLAYER,
        &format!(
            r#"{{"player_id":"{}","jobs":{{"miner":{{"current_xp":0,"total_xp":0,"level":0}}}}}}"#,
            PLAYER
        ),
    );

    cli(&data_dir, &config_path)
        .args(["status", "--player", PLAYER])
        .assert()
        .success()
        .stdout(predicate::str::contains("level   1"));
}

#[test]
fn test_corrupted_journal_lines_do_not_block_appends() {
    let (temp_dir, config_path) = setup_test_dir();
    let data_dir = temp_dir.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();

    let journal_path = data_dir.join("awards.jsonl");
    let mut file = fs::File::create(&journal_path).unwrap();
    // Truncated line, as if a previous process crashed mid-write
    writeln!(file, r#"{{"id":"00000000-0000-0000-0000-000000000000","player"#).unwrap();
    drop(file);

    cli(&data_dir, &config_path)
        .args(["act", "--player", PLAYER, "--material", "stone"])
        .assert()
        .success();

    let content = fs::read_to_string(&journal_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(serde_json::from_str::<serde_json::Value>(lines[0]).is_err());
    let entry: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(entry["player_id"], PLAYER);
}

#[test]
fn test_stray_files_ignored_by_export() {
    let (temp_dir, config_path) = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(&data_dir, &config_path)
        .args(["act", "--player", PLAYER, "--material", "stone"])
        .assert()
        .success();
    write_player(&data_dir, "not-a-player", "garbage");
    fs::write(data_dir.join("players/README.txt"), "notes").unwrap();

    let csv_path = temp_dir.path().join("progress.csv");
    cli(&data_dir, &config_path)
        .arg("export")
        .arg("--output")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 rows"));
}

#[test]
fn test_concurrent_players_share_journal() {
    let (temp_dir, config_path) = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    let players = [
        "11111111-1111-4111-8111-111111111111",
        "22222222-2222-4222-8222-222222222222",
        "33333333-3333-4333-8333-333333333333",
        "44444444-4444-4444-8444-444444444444",
    ];

    let handles: Vec<_> = players
        .iter()
        .map(|player| {
            let data_dir = data_dir.clone();
            let config_path = config_path.clone();
            let player = player.to_string();
            thread::spawn(move || {
                cli(&data_dir, &config_path)
                    .args(["act", "--player", player.as_str(), "--material", "diamond_ore", "--count", "3"])
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    // Every award made it into the journal intact
    let content = fs::read_to_string(data_dir.join("awards.jsonl")).unwrap();
    let entries: Vec<serde_json::Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).expect("Corrupted journal line"))
        .collect();
    assert_eq!(entries.len(), 12);

    for player in players {
        let record: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(data_dir.join(format!("players/{}.json", player))).unwrap(),
        )
        .unwrap();
        assert_eq!(record["jobs"]["miner"]["total_xp"], 150);
    }
}
