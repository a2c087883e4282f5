use std::fs;

use chrono::NaiveDate;
use hb_core::{CoreError, EntryStorage, SampleGenerator};
use hb_domain::{Entry, EntryKind};
use hb_storage_json::JsonEntryStorage;
use tempfile::tempdir;

fn entry(day: u32, amount: f64) -> Entry {
    Entry::new(
        EntryKind::Expense,
        "home",
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
        amount,
    )
}

#[test]
fn missing_file_loads_as_empty() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonEntryStorage::new(dir.path().join("data")).expect("create storage");
    assert!(storage.load_entries().expect("load").is_empty());
}

#[test]
fn json_storage_can_save_and_load_entries() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonEntryStorage::new(dir.path().to_path_buf()).expect("create storage");
    let entries = vec![entry(1, 12.5), entry(2, 7.25).with_description("Bulbs")];

    storage.save_entries(&entries).expect("save entries");
    let loaded = storage.load_entries().expect("load entries");

    assert_eq!(loaded, entries);
    let raw = fs::read_to_string(storage.entries_path()).expect("read file");
    assert!(raw.contains("\"categoryId\": \"home\""));
}

#[test]
fn saving_over_existing_file_keeps_limited_backups() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonEntryStorage::with_retention(dir.path().to_path_buf(), 2)
        .expect("create storage");

    for amount in 1..=4 {
        storage
            .save_entries(&[entry(1, amount as f64)])
            .expect("save entries");
    }

    let backups = storage.list_backups().expect("list backups");
    assert_eq!(backups.len(), 2);
    let newest = storage.restore_backup(&backups[0]).expect("restore");
    assert_eq!(newest[0].amount, 3.0);
    assert_eq!(storage.load_entries().expect("reload")[0].amount, 3.0);
}

#[test]
fn rapid_saves_keep_the_newest_backups() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonEntryStorage::with_retention(dir.path().to_path_buf(), 2)
        .expect("create storage");

    for amount in 1..=12 {
        storage
            .save_entries(&[entry(1, amount as f64)])
            .expect("save entries");
    }

    let backups = storage.list_backups().expect("list backups");
    assert_eq!(backups.len(), 2);
    let amounts: Vec<f64> = backups
        .iter()
        .map(|info| hb_storage_json::load_entries_from_path(&info.path).expect("read")[0].amount)
        .collect();
    assert_eq!(amounts, vec![11.0, 10.0]);
}

#[test]
fn manual_backup_includes_note() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonEntryStorage::new(dir.path().to_path_buf()).expect("create storage");
    storage.save_entries(&[entry(3, 9.0)]).expect("save");

    let info = storage.backup(Some("Before cleanup")).expect("backup");
    assert!(info.id.starts_with("entries_"));
    assert!(info.id.ends_with("_before-cleanup.json"));
    assert!(info.path.exists());
}

#[test]
fn corrupt_file_reports_serde_error() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonEntryStorage::new(dir.path().to_path_buf()).expect("create storage");
    fs::write(storage.entries_path(), "{ not json").expect("write");

    assert!(matches!(storage.load_entries(), Err(CoreError::Serde(_))));
}

#[test]
fn legacy_browser_export_loads() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonEntryStorage::new(dir.path().to_path_buf()).expect("create storage");
    fs::write(
        storage.entries_path(),
        r#"[
            {"id":"2f1c3c9e-1d8a-4f0e-8a53-6d1e0b9a7c11","date":"2024-02-10T12:00:00.000Z","amount":18.4,"categoryId":"utilites","description":"Lorem ipsum dolor sit amet."},
            {"id":"k3x9q0b7wd2","date":"2024-02-11","amount":900,"categoryId":"salary","type":"inc"}
        ]"#,
    )
    .expect("write");

    let loaded = storage.load_entries().expect("load");
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].category_id, "utilities");
    assert_eq!(loaded[0].date, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
    assert_eq!(loaded[1].kind, EntryKind::Income);
    assert_eq!(loaded[1].signed_amount(), 900.0);
}

#[test]
fn load_or_seed_persists_sample_data() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonEntryStorage::new(dir.path().to_path_buf()).expect("create storage");
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let seeded = storage
        .load_or_seed(&mut SampleGenerator::new(3), 25, today)
        .expect("seed");
    assert_eq!(seeded.len(), 25);
    assert_eq!(storage.load_entries().expect("reload").len(), 25);
}
