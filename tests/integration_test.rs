//! End-to-end tests for the macmap reconciliation pipeline.
//!
//! Each test writes the three inputs (old users, MAC export, new users) to a
//! fresh `TempDir`, reads them back the way the CLI does, and checks the preview
//! JSON or the CSV export.
//!
//! # Sample Data
//!
//! `sample_inputs()` models a small migration:
//! - 4 old users, one of them listed twice in the MAC export
//! - MAC values in colon, dash, bare and invalid spellings
//! - new users whose usernames differ from the old ones in case and padding
//! - orphan records in both the MAC export and the new directory

use anyhow::Result;
use macmap::{export, preview_json, run, FileKind, Inputs, MapError, ReconcileOptions};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const OLD_CSV: &str = "\u{feff}id,username,email\r\n\
    101,alice,alice@example.com\r\n\
    102,Bob,bob@example.com\r\n\
    103,\"carol, jr\",carol@example.com\r\n\
    104,dave,dave@example.com\r\n";

const MAGS_CSV: &str = "user_id,mac\n\
    101,AA:BB:CC:DD:EE:01\n\
    103,aa-bb-cc-dd-ee-03\n\
    999,aabbccddee99\n\
    104,not-a-mac\n\
    101,aabbccddee11\n";

const NEW_CSV: &str = "Username,ID\n\
    ALICE ,n-1\n\
    bob,n-2\n\
    erin,n-5\n";

/// Helper: write a named input file into the temp dir.
fn write_input(dir: &Path, name: &str, content: &str) -> Result<String> {
    let path = dir.join(name);
    fs::write(&path, content)?;
    Ok(path.to_string_lossy().into_owned())
}

fn read_inputs(dir: &Path) -> Result<Inputs> {
    Ok(Inputs::new(
        fs::read(dir.join("old.csv"))?,
        fs::read(dir.join("mags.csv"))?,
        fs::read(dir.join("new.csv"))?,
    ))
}

fn sample_inputs() -> Result<(TempDir, Inputs)> {
    let dir = TempDir::new()?;
    write_input(dir.path(), "old.csv", OLD_CSV)?;
    write_input(dir.path(), "mags.csv", MAGS_CSV)?;
    write_input(dir.path(), "new.csv", NEW_CSV)?;
    let inputs = read_inputs(dir.path())?;
    Ok((dir, inputs))
}

#[test]
fn test_export_full_mapping() -> Result<()> {
    let (_dir, inputs) = sample_inputs()?;
    let exported = export(&inputs, &ReconcileOptions::default())?;

    assert_eq!(exported.filename, "user_mac_mapping.csv");
    assert_eq!(exported.content_type, "text/csv");
    assert_eq!(
        exported.body,
        "old_user_id,mac_address,new_user_id,username\n\
         101,aa:bb:cc:dd:ee:11,n-1,alice\n\
         102,N/A,n-2,Bob\n\
         103,aa:bb:cc:dd:ee:03,N/A,\"carol, jr\"\n\
         104,N/A,N/A,dave\n"
    );
    Ok(())
}

#[test]
fn test_orphans_never_reach_output() -> Result<()> {
    let (_dir, inputs) = sample_inputs()?;
    let mapping = run(&inputs, &ReconcileOptions::default())?;
    let body = mapping.export()?.body;

    assert!(!body.contains("999"));
    assert!(!body.contains("aa:bb:cc:dd:ee:99"));
    assert!(!body.contains("erin"));
    assert!(!body.contains("n-5"));

    assert_eq!(mapping.diagnostics.orphaned_macs, 1);
    assert_eq!(mapping.diagnostics.orphaned_new_users, 1);
    assert_eq!(mapping.diagnostics.invalid_macs, 1);
    assert_eq!(mapping.diagnostics.duplicate_mac_keys, 1);
    Ok(())
}

#[test]
fn test_preview_json() -> Result<()> {
    let (_dir, inputs) = sample_inputs()?;
    let json: Value = serde_json::from_str(&preview_json(&inputs, &ReconcileOptions::default())?)?;

    assert_eq!(json["success"], true);
    assert_eq!(json["total_mappings"], 4);
    assert_eq!(json["with_mac"], 2);
    assert_eq!(json["without_mac"], 2);

    let sample = json["sample"].as_array().expect("sample array");
    assert_eq!(sample.len(), 4);
    assert_eq!(sample[1]["mac_address"], "N/A");
    assert_eq!(sample[3]["new_user_id"], "N/A");
    assert_eq!(sample[2]["username"], "carol, jr");
    Ok(())
}

#[test]
fn test_export_is_deterministic() -> Result<()> {
    let (dir, inputs) = sample_inputs()?;
    let first = export(&inputs, &ReconcileOptions::default())?;
    let second = export(&read_inputs(dir.path())?, &ReconcileOptions::default())?;
    assert_eq!(first.body.as_bytes(), second.body.as_bytes());
    Ok(())
}

#[test]
fn test_row_count_and_order_follow_old_users() -> Result<()> {
    let dir = TempDir::new()?;
    let mut old = String::from("id,username\n");
    for i in (0..40).rev() {
        old.push_str(&format!("u{i},user{i}\n"));
    }
    // Malformed row is dropped, not mapped
    old.push_str("u-bad\n");
    write_input(dir.path(), "old.csv", &old)?;
    write_input(dir.path(), "mags.csv", "user_id,mac_address\nu7,00:00:00:00:00:07\n")?;
    write_input(dir.path(), "new.csv", "id,username\nn7,USER7\n")?;

    let mapping = run(&read_inputs(dir.path())?, &ReconcileOptions::default())?;
    let stats = mapping.stats();
    assert_eq!(stats.total_mappings, 40);
    assert_eq!(stats.with_mac + stats.without_mac, stats.total_mappings);
    assert_eq!(mapping.diagnostics.malformed_rows, 1);

    let ids: Vec<String> = mapping.rows.iter().map(|r| r.old_user_id.clone()).collect();
    let expected: Vec<String> = (0..40).rev().map(|i| format!("u{i}")).collect();
    assert_eq!(ids, expected);

    let body = mapping.export()?.body;
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 41);
    assert!(lines.contains(&"u7,00:00:00:00:00:07,n7,user7"));

    // Preview stays bounded
    assert_eq!(mapping.preview().sample.len(), 10);
    Ok(())
}

#[test]
fn test_missing_column_produces_no_output() -> Result<()> {
    let dir = TempDir::new()?;
    write_input(dir.path(), "old.csv", "id,username\nu1,alice\n")?;
    write_input(dir.path(), "mags.csv", "user_id,hardware\nu1,aabbccddee01\n")?;
    write_input(dir.path(), "new.csv", "id,username\nn1,alice\n")?;

    let err = export(&read_inputs(dir.path())?, &ReconcileOptions::default()).unwrap_err();
    assert_eq!(err.status(), 400);
    assert!(err.to_string().contains("mac"));
    match err {
        MapError::Schema { file, missing } => {
            assert_eq!(file, FileKind::Mags);
            assert_eq!(missing, vec!["mac"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn test_missing_file_is_client_error() {
    let inputs = Inputs {
        old_file: Some(OLD_CSV.as_bytes().to_vec()),
        mags_file: None,
        new_file: Some(NEW_CSV.as_bytes().to_vec()),
    };
    let err = preview_json(&inputs, &ReconcileOptions::default()).unwrap_err();
    assert_eq!(err.status(), 400);
    assert_eq!(
        err.to_detail()["detail"],
        "Missing required file(s): mags_file"
    );
}

#[test]
fn test_null_looking_users_keep_their_rows() -> Result<()> {
    let dir = TempDir::new()?;
    write_input(dir.path(), "old.csv", "id,username\nu1,alice\nu2,n/a\nu3,N/A\n")?;
    write_input(dir.path(), "mags.csv", "user_id,mac\nu2,aabbccddee02\nu1,\\N\n")?;
    write_input(dir.path(), "new.csv", "id,username\nn2,n/a\n")?;

    let mapping = run(&read_inputs(dir.path())?, &ReconcileOptions::default())?;
    assert_eq!(mapping.rows.len(), 3);
    assert_eq!(mapping.diagnostics.malformed_rows, 0);
    // The \N MAC is loaded but never matches
    assert_eq!(mapping.diagnostics.invalid_macs, 1);

    // u3 folds to the same username as u2
    assert_eq!(
        mapping.export()?.body,
        "old_user_id,mac_address,new_user_id,username\n\
         u1,N/A,N/A,alice\n\
         u2,aa:bb:cc:dd:ee:02,n2,n/a\n\
         u3,N/A,n2,N/A\n"
    );
    Ok(())
}
