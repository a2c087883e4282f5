use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;

use crate::{
    dashboard_service::DashboardService,
    entry_form::EntryForm,
    entry_log::EntryLog,
    histogram::histogram,
    sample::SampleGenerator,
    storage::{BackupInfo, EntryStorage},
    time::{Clock, FixedClock},
    CoreError,
};
use hb_domain::{DateRange, Entry, EntryKind, Repeat};

#[derive(Default)]
struct MemoryStorage {
    entries: Mutex<Vec<Entry>>,
    saves: Mutex<usize>,
}

impl EntryStorage for MemoryStorage {
    fn load_entries(&self) -> Result<Vec<Entry>, CoreError> {
        Ok(self.entries.lock().unwrap().clone())
    }

    fn save_entries(&self, entries: &[Entry]) -> Result<(), CoreError> {
        *self.entries.lock().unwrap() = entries.to_vec();
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    fn backup(&self, _note: Option<&str>) -> Result<BackupInfo, CoreError> {
        Ok(BackupInfo {
            id: "memory".into(),
            created_at: "now".into(),
            path: PathBuf::new(),
        })
    }

    fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        Ok(Vec::new())
    }

    fn restore_backup(&self, _backup: &BackupInfo) -> Result<Vec<Entry>, CoreError> {
        self.load_entries()
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn empty_storage_is_seeded_once() {
    let storage = MemoryStorage::default();
    let clock = FixedClock::on(date(2024, 6, 30));
    let mut generator = SampleGenerator::new(1);

    let first = storage
        .load_or_seed(&mut generator, 50, clock.today())
        .expect("seed entries");
    assert_eq!(first.len(), 50);
    assert_eq!(*storage.saves.lock().unwrap(), 1);

    let second = storage
        .load_or_seed(&mut generator, 50, clock.today())
        .expect("reload entries");
    assert_eq!(second.len(), 50);
    assert_eq!(*storage.saves.lock().unwrap(), 1);
}

#[test]
fn seeding_can_be_disabled_with_zero_count() {
    let storage = MemoryStorage::default();
    let entries = storage
        .load_or_seed(&mut SampleGenerator::new(1), 0, date(2024, 1, 1))
        .expect("load");
    assert!(entries.is_empty());
    assert_eq!(*storage.saves.lock().unwrap(), 0);
}

#[test]
fn saved_form_flows_into_dashboard_and_histogram() {
    let mut log = EntryLog::default();

    let mut form = EntryForm::new(EntryKind::Expense, date(2024, 1, 1));
    form.select_category("insurance", date(2024, 1, 15)).unwrap();
    form.set_amount(0, Some(120.0)).unwrap();
    form.set_repeat(Repeat::Monthly);
    form.set_until(Some(date(2024, 12, 31)));
    let outcome = form.save().expect("save form");
    assert_eq!(outcome.entries.len(), 12);
    log.append(outcome.entries);

    let range = DateRange::new(date(2024, 1, 1), date(2024, 7, 1)).unwrap();
    let dashboard = DashboardService::build(log.entries(), range, Some("insurance"));
    assert_eq!(dashboard.entries.len(), 6);
    assert_eq!(dashboard.total, 720.0);
    assert_eq!(dashboard.monthly.len(), 12);
    assert!(dashboard
        .monthly
        .iter()
        .all(|month| month.total == 120.0 && month.category_total == 120.0));
    assert_eq!(dashboard.pie.len(), 1);
    assert_eq!(dashboard.pie[0].name, "Insurance");

    let buckets = histogram(log.entries(), range, None);
    assert_eq!(buckets.len(), 6);
    assert!(buckets.iter().all(|bucket| bucket.total == 120.0));
    assert!(buckets.iter().all(|bucket| bucket.sub_category == 0.0));
}
