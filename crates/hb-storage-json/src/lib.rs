//! hb-storage-json
//!
//! Filesystem JSON persistence for the entry list and its backups.

use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{Duration, NaiveDateTime, Utc};
use tracing::{debug, info};

use hb_core::{BackupInfo, CoreError, EntryStorage};
use hb_domain::Entry;

const ENTRIES_FILE: &str = "entries.json";
const BACKUPS_DIR: &str = "backups";
const BACKUP_PREFIX: &str = "entries";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";
const BACKUP_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Stores every entry in a single pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonEntryStorage {
    entries_path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonEntryStorage {
    pub fn new(data_dir: PathBuf) -> Result<Self, CoreError> {
        Self::with_retention(data_dir, DEFAULT_RETENTION)
    }

    pub fn with_retention(data_dir: PathBuf, retention: usize) -> Result<Self, CoreError> {
        let backups_dir = data_dir.join(BACKUPS_DIR);
        fs::create_dir_all(&data_dir)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            entries_path: data_dir.join(ENTRIES_FILE),
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn entries_path(&self) -> &Path {
        &self.entries_path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Backup names carry `<date>_<time with millis>_<sequence>`; the
    /// sequence always exceeds every existing one so names never repeat.
    fn copy_to_backup(&self, note: Option<&str>) -> Result<BackupInfo, CoreError> {
        fs::create_dir_all(&self.backups_dir)?;
        let now = Utc::now().naive_utc();
        let sequence = self
            .list_backups()?
            .iter()
            .filter_map(|info| parse_backup_name(&info.id))
            .map(|(_, sequence)| sequence)
            .max()
            .map_or(1, |highest| highest + 1);
        let mut file_name = format!(
            "{BACKUP_PREFIX}_{}_{sequence:06}",
            now.format(BACKUP_TIMESTAMP_FORMAT)
        );
        if let Some(label) = sanitize_backup_note(note) {
            file_name.push('_');
            file_name.push_str(&label);
        }
        file_name.push('.');
        file_name.push_str(BACKUP_EXTENSION);

        let path = self.backups_dir.join(&file_name);
        if self.entries_path.exists() {
            fs::copy(&self.entries_path, &path)?;
        } else {
            write_atomic(&path, "[]")?;
        }
        self.prune_backups()?;
        debug!(backup = %file_name, "entry backup written");
        Ok(BackupInfo {
            id: file_name,
            created_at: now.format(BACKUP_DISPLAY_FORMAT).to_string(),
            path,
        })
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for entry in self.list_backups()?.into_iter().skip(self.retention) {
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl EntryStorage for JsonEntryStorage {
    fn load_entries(&self) -> Result<Vec<Entry>, CoreError> {
        if !self.entries_path.exists() {
            return Ok(Vec::new());
        }
        load_entries_from_path(&self.entries_path)
    }

    fn save_entries(&self, entries: &[Entry]) -> Result<(), CoreError> {
        if self.entries_path.exists() {
            self.copy_to_backup(None)?;
        }
        save_entries_to_path(entries, &self.entries_path)?;
        info!(count = entries.len(), path = %self.entries_path.display(), "entries saved");
        Ok(())
    }

    fn backup(&self, note: Option<&str>) -> Result<BackupInfo, CoreError> {
        self.copy_to_backup(note)
    }

    /// Newest first.
    fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if !file_name.starts_with(BACKUP_PREFIX) {
                continue;
            }
            backups.push(BackupInfo {
                id: file_name.to_string(),
                created_at: parse_backup_name(file_name)
                    .map(|(ts, _)| ts.format(BACKUP_DISPLAY_FORMAT).to_string())
                    .unwrap_or_else(|| "unknown".into()),
                path: path.clone(),
            });
        }
        backups.sort_by_key(|info| {
            let order = parse_backup_name(&info.id).map(|(created, sequence)| (sequence, created));
            Reverse((order, info.id.clone()))
        });
        Ok(backups)
    }

    fn restore_backup(&self, backup: &BackupInfo) -> Result<Vec<Entry>, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!("backup `{}` not found", backup.id)));
        }
        let entries = load_entries_from_path(&backup.path)?;
        save_entries_to_path(&entries, &self.entries_path)?;
        info!(backup = %backup.id, count = entries.len(), "backup restored");
        Ok(entries)
    }
}

/// Saves entries to an arbitrary path via a temporary file and rename.
pub fn save_entries_to_path(entries: &[Entry], path: &Path) -> Result<(), CoreError> {
    let json =
        serde_json::to_string_pretty(entries).map_err(|err| CoreError::Serde(err.to_string()))?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_entries_from_path(path: &Path) -> Result<Vec<Entry>, CoreError> {
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
}

/// Creation time and sequence number encoded in a backup file name.
/// Names without a sequence segment report zero.
fn parse_backup_name(file_name: &str) -> Option<(NaiveDateTime, u64)> {
    let stem = file_name.strip_suffix(&format!(".{BACKUP_EXTENSION}"))?;
    let mut segments = stem.split('_').skip(1);
    let date = segments.next()?;
    let time = segments.next()?;
    if time.len() < 6 || !time.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (clock, millis) = time.split_at(6);
    let mut created =
        NaiveDateTime::parse_from_str(&format!("{date}{clock}"), "%Y%m%d%H%M%S").ok()?;
    if !millis.is_empty() {
        created += Duration::milliseconds(millis.parse().ok()?);
    }
    let sequence = segments
        .next()
        .and_then(|segment| segment.parse().ok())
        .unwrap_or(0);
    Some((created, sequence))
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !sanitized.is_empty() && !last_dash {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_are_slugged() {
        assert_eq!(
            sanitize_backup_note(Some("Before tax, 2024!")).as_deref(),
            Some("before-tax-2024")
        );
        assert_eq!(sanitize_backup_note(Some("  ")), None);
        assert_eq!(sanitize_backup_note(Some("***")), None);
    }

    #[test]
    fn backup_names_parse_timestamps_and_sequence() {
        let (ts, sequence) =
            parse_backup_name("entries_20240105_093015250_000012_before-tax.json").unwrap();
        assert_eq!(ts.format("%H:%M:%S%.3f").to_string(), "09:30:15.250");
        assert_eq!(sequence, 12);

        let (ts, sequence) = parse_backup_name("entries_20240105_093015_before-tax.json").unwrap();
        assert_eq!(ts.format(BACKUP_DISPLAY_FORMAT).to_string(), "2024-01-05 09:30:15");
        assert_eq!(sequence, 0);

        assert!(parse_backup_name("entries.json").is_none());
    }

    #[test]
    fn sequence_orders_backups_within_one_millisecond() {
        let older = parse_backup_name("entries_20240105_093015250_000009.json");
        let newer = parse_backup_name("entries_20240105_093015250_000010.json");
        assert!(newer > older);
    }
}
