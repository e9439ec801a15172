//! Basic CLI E2E tests.
//!
//! Each test runs the `habit` binary against its own temporary database.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(db: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_habit"))
        .arg("--db")
        .arg(db)
        .args(args)
        .env_remove("HABIT_TRACKER_LOG_DIR")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(db: &Path, args: &[&str]) -> serde_json::Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let (stdout, stderr, code) = run_cli(db, &full);
    assert_eq!(code, 0, "command {args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout should be JSON")
}

fn add_habit(db: &Path, name: &str) -> String {
    let created = run_json(db, &["add", name]);
    created["id"].as_str().unwrap().to_string()
}

#[test]
fn add_then_list_shows_habit() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("habits.sqlite3");

    let id = add_habit(&db, "Test Habit");
    let (stdout, _, code) = run_cli(&db, &["list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Test Habit"));
    assert!(stdout.contains(&id));
}

#[test]
fn blank_name_is_rejected_with_error_exit() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("habits.sqlite3");

    let (_, stderr, code) = run_cli(&db, &["add", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error: habit name must not be blank"));

    let listed = run_json(&db, &["list"]);
    assert_eq!(listed.as_array().unwrap().len(), 0);
}

#[test]
fn toggle_twice_restores_state() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("habits.sqlite3");
    let id = add_habit(&db, "Streaker");

    let first = run_json(&db, &["toggle", &id, "--date", "2024-05-01"]);
    assert_eq!(first["state"], "checked");
    let second = run_json(&db, &["toggle", &id, "--date", "2024-05-01"]);
    assert_eq!(second["state"], "unchecked");

    let history = run_json(
        &db,
        &["history", &id, "--from", "2024-04-01", "--to", "2024-05-31"],
    );
    assert_eq!(history["dates"].as_array().unwrap().len(), 0);
}

#[test]
fn toggle_today_starts_a_streak() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("habits.sqlite3");
    let id = add_habit(&db, "Today");

    run_json(&db, &["toggle", &id]);
    let detail = run_json(&db, &["show", &id]);
    assert_eq!(detail["streak"], 1);
    assert_eq!(detail["checked_today"], true);
    assert_eq!(detail["days"].as_array().unwrap().len(), 30);
}

#[test]
fn archive_hides_from_list_until_all_flag() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("habits.sqlite3");
    let id = add_habit(&db, "Old habit");

    let (_, _, code) = run_cli(&db, &["archive", &id]);
    assert_eq!(code, 0);

    assert_eq!(run_json(&db, &["list"]).as_array().unwrap().len(), 0);
    let all = run_json(&db, &["list", "--all"]);
    assert_eq!(all[0]["habit"]["archived"], true);
}

#[test]
fn delete_then_show_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("habits.sqlite3");
    let id = add_habit(&db, "Gone");

    let (_, _, code) = run_cli(&db, &["delete", &id]);
    assert_eq!(code, 0);

    let (_, stderr, code) = run_cli(&db, &["show", &id]);
    assert_eq!(code, 1);
    assert!(stderr.contains("habit not found"));
}

#[test]
fn reversed_history_range_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("habits.sqlite3");
    let id = add_habit(&db, "Range");

    let (_, stderr, code) = run_cli(
        &db,
        &["history", &id, "--from", "2024-02-01", "--to", "2024-01-01"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("is after end"));
}

#[test]
fn list_all_keeps_creation_order_with_archived_habits() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("habits.sqlite3");
    let first = add_habit(&db, "First");
    add_habit(&db, "Second");
    run_json(&db, &["archive", &first]);

    let all = run_json(&db, &["list", "--all"]);
    let names: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["habit"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["First", "Second"]);
}

#[test]
fn archive_and_delete_report_id_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("habits.sqlite3");
    let id = add_habit(&db, "Ack");

    let archived = run_json(&db, &["archive", &id]);
    assert_eq!(archived["id"], id.as_str());
    let deleted = run_json(&db, &["delete", &id]);
    assert_eq!(deleted["id"], id.as_str());
}
