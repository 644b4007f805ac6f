//! File ingestion into the pipeline.
//!
//! Exercises the snapshot loader and the commit/chat overlays end to end:
//! files on disk, through the fail-soft parsers, into signal and confidence
//! changes in the final result.

use std::io::Write;

use chrono::NaiveDate;
use flowguard_core::parse::{chat, commits};
use flowguard_core::{Analyzer, Confidence, ProjectData};

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()
}

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn base_snapshot() -> ProjectData {
    serde_json::from_str(
        r#"{
            "project_name": "Overlay Test",
            "release_date": "2025-03-15",
            "initial_features": ["Auth"],
            "current_features": ["Auth"],
            "tasks": [
                {
                    "title": "Auth hardening",
                    "assigned_to": "Dev A",
                    "last_updated_days_ago": 2,
                    "status": "In Progress"
                }
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn test_snapshot_loads_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "project.json",
        &serde_json::to_string(&base_snapshot()).unwrap(),
    );

    let data = ProjectData::from_json_file(&path).unwrap();
    assert_eq!(data.project_name, "Overlay Test");
    // Optional sources default to empty.
    assert!(data.commits.is_empty());
    assert!(data.budget_items.is_empty());
}

#[test]
fn test_snapshot_load_failures() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ProjectData::from_json_file(&dir.path().join("missing.json")).is_err());

    let bad = write_file(&dir, "bad.json", "{ not json");
    assert!(ProjectData::from_json_file(&bad).is_err());
}

#[test]
fn test_commit_log_overlay_shifts_confidence() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_file(
        &dir,
        "commits.csv",
        "sha,author,date,message\n\
         a1,Dev A,2025-01-05,feat: auth setup\n\
         a2,Dev A,2025-01-06,feat: sessions\n\
         a3,Dev B,2025-01-07,feat: tokens\n\
         a4,Dev A,2025-02-01,\"fix: expiry, again\"\n",
    );

    let mut data = base_snapshot();
    let text = std::fs::read_to_string(log).unwrap();
    data.commits = commits::parse_commit_log(&text);
    assert_eq!(data.commits.len(), 4);
    assert_eq!(data.commits[3].message, "fix: expiry, again");

    let analyzer = Analyzer::new();
    let without = analyzer.analyze_at(&base_snapshot(), reference_date());
    let with = analyzer.analyze_at(&data, reference_date());

    assert_eq!(without.signals.commit_velocity, 0);
    assert!(with.signals.commit_velocity > 0);
    // Still one source: confidence stays Low until a second one appears.
    assert_eq!(with.confidence, Confidence::Low);
}

#[test]
fn test_chat_overlay_feeds_both_signals() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_file(
        &dir,
        "chat.txt",
        "Messages and calls are end-to-end encrypted.\n\
         01/02/2025, 09:14 - Dev A: kickoff for the release\n\
         01/02/2025, 09:20 - Dev B: still waiting on approval for payments\n\
         09/02/2025, 11:02 - Dev A: back after the offsite\n\
         which ran long\n",
    );

    let mut data = base_snapshot();
    let text = std::fs::read_to_string(export).unwrap();
    data.chat_messages = chat::parse_chat_export(&text);
    assert_eq!(data.chat_messages.len(), 3);
    assert_eq!(
        data.chat_messages[2].text,
        "back after the offsite\nwhich ran long"
    );

    let result = Analyzer::new().analyze_at(&data, reference_date());
    // 8-day gap * 8 + 2 keyword hits * 4.
    assert_eq!(result.signals.communication_gap, 72);
    // Chat keywords also feed the waiting score: 2 hits * 6.
    assert_eq!(result.signals.waiting, 12);
}

#[test]
fn test_unusable_overlays_degrade_to_empty() {
    let mut data = base_snapshot();
    data.commits = commits::parse_commit_log("this is not a commit log at all");
    data.chat_messages = chat::parse_chat_export("no timestamps anywhere");

    assert!(data.commits.is_empty());
    assert!(data.chat_messages.is_empty());

    // The pipeline still runs and treats the sources as absent.
    let result = Analyzer::new().analyze_at(&data, reference_date());
    assert_eq!(result.signals.commit_velocity, 0);
    assert_eq!(result.signals.communication_gap, 0);
    assert_eq!(result.confidence, Confidence::Low);
}
