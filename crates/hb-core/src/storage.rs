use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::warn;

use hb_domain::Entry;

use crate::{sample::SampleGenerator, CoreError};

/// Describes a persisted backup of the entry file.
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Abstraction over persistence backends capable of storing the entry list and backups.
pub trait EntryStorage: Send + Sync {
    fn load_entries(&self) -> Result<Vec<Entry>, CoreError>;
    fn save_entries(&self, entries: &[Entry]) -> Result<(), CoreError>;
    fn backup(&self, note: Option<&str>) -> Result<BackupInfo, CoreError>;
    fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &BackupInfo) -> Result<Vec<Entry>, CoreError>;

    /// Loads stored entries, seeding and persisting demo data when none exist.
    fn load_or_seed(
        &self,
        generator: &mut SampleGenerator,
        count: usize,
        today: NaiveDate,
    ) -> Result<Vec<Entry>, CoreError> {
        let entries = self.load_entries()?;
        if !entries.is_empty() || count == 0 {
            return Ok(entries);
        }
        warn!(count, "no stored entries, seeding sample data");
        let seeded = generator.generate(count, today);
        self.save_entries(&seeded)?;
        Ok(seeded)
    }
}
