//! Integration tests for the sanitize and segment pipeline

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use shellscope::transcript::{extract_last, sanitize, segment, Extraction};

use crate::helpers::{copy_fixture, fixtures_dir};

#[test]
fn recorded_session_yields_last_command() {
    let temp = TempDir::new().unwrap();
    let raw = copy_fixture(temp.path(), "nmap_session.log", "live-session.log");
    let clean = temp.path().join("cleaned-session.log");

    sanitize(&raw, &clean).unwrap();

    let record = extract_last(&clean).into_record().unwrap();
    assert_eq!(record.command, "whoami");
    assert_eq!(record.output(), "root");
}

#[test]
fn recorded_session_cleaned_text_is_printable() {
    let temp = TempDir::new().unwrap();
    let raw = copy_fixture(temp.path(), "nmap_session.log", "live-session.log");
    let clean = temp.path().join("cleaned-session.log");

    let stats = sanitize(&raw, &clean).unwrap();
    let text = fs::read_to_string(&clean).unwrap();

    assert!(stats.removed_bytes() > 0);
    assert!(!text.contains('\x1b'));
    assert!(!text.contains('\r'));
    assert!(text.chars().all(|c| c == '\n' || (' '..='~').contains(&c)));
    assert!(text.contains("\n# nmap -sV 10.0.0.5\n"));
}

#[test]
fn recorded_session_segments_in_order() {
    let temp = TempDir::new().unwrap();
    let raw = copy_fixture(temp.path(), "nmap_session.log", "live-session.log");
    let clean = temp.path().join("cleaned-session.log");
    sanitize(&raw, &clean).unwrap();

    let records = segment(&fs::read_to_string(&clean).unwrap());

    let commands: Vec<&str> = records.iter().map(|r| r.command.as_str()).collect();
    assert_eq!(commands, vec!["nmap -sV 10.0.0.5", "whoami"]);
    assert_eq!(
        records[0].output_lines,
        vec![
            "Starting Nmap 7.94 ( https://nmap.org )",
            "PORT   STATE SERVICE VERSION",
            "22/tcp open  ssh     OpenSSH 8.9p1",
            "80/tcp open  http    Apache httpd 2.4.52",
        ]
    );
}

#[test]
fn cleaned_fixture_trims_trailing_whitespace() {
    let record = extract_last(&fixtures_dir().join("cleaned_session.log"))
        .into_record()
        .unwrap();

    assert_eq!(record.command, "curl -I http://10.0.0.5");
    assert_eq!(record.output(), "HTTP/1.1 200 OK\nServer: Apache/2.4.52");
}

#[test]
fn log_without_markers_has_no_command() {
    let extraction = extract_last(&fixtures_dir().join("no_commands.log"));
    assert_eq!(extraction, Extraction::NoCommand);
}

#[test]
fn missing_clean_log_is_not_found() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("never-written.log");

    assert_eq!(extract_last(&path), Extraction::NotFound { path });
}

#[test]
fn resanitizing_the_clean_log_changes_nothing() {
    let temp = TempDir::new().unwrap();
    let raw = copy_fixture(temp.path(), "nmap_session.log", "live-session.log");
    let once = temp.path().join("once.log");
    let twice = temp.path().join("twice.log");

    sanitize(&raw, &once).unwrap();
    sanitize(&once, &twice).unwrap();

    assert_eq!(fs::read(&once).unwrap(), fs::read(&twice).unwrap());
}
