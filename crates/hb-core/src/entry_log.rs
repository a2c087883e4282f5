//! In-memory entry list shared by the log, the entry form, and the dashboard.

use tracing::info;
use uuid::Uuid;

use hb_domain::Entry;

use crate::CoreError;

/// Owns the entry list and tracks whether it changed since the last persist.
#[derive(Debug, Clone, Default)]
pub struct EntryLog {
    entries: Vec<Entry>,
    dirty: bool,
}

impl EntryLog {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            dirty: false,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn append(&mut self, entries: impl IntoIterator<Item = Entry>) -> usize {
        let before = self.entries.len();
        self.entries.extend(entries);
        let added = self.entries.len() - before;
        if added > 0 {
            self.dirty = true;
            info!(added, total = self.entries.len(), "entries appended");
        }
        added
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Entry, CoreError> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(CoreError::EntryNotFound(id))?;
        let removed = self.entries.remove(index);
        self.dirty = true;
        info!(%id, "entry removed");
        Ok(removed)
    }

    /// Resolves an entry from a unique, case-insensitive id prefix, given in
    /// either the hyphenated or the simple (hex only) form.
    pub fn resolve_prefix(&self, prefix: &str) -> Result<Uuid, CoreError> {
        let needle = prefix.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Err(CoreError::Validation("entry id is required".into()));
        }
        let mut matches = self
            .entries
            .iter()
            .filter(|entry| {
                entry.id.hyphenated().to_string().starts_with(&needle)
                    || entry.id.simple().to_string().starts_with(&needle)
            });
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(entry.id),
            (Some(_), Some(_)) => Err(CoreError::Validation(format!(
                "entry id prefix `{prefix}` is ambiguous"
            ))),
            (None, _) => Err(CoreError::InvalidOperation(format!(
                "no entry matches `{prefix}`"
            ))),
        }
    }

    /// Entries sorted newest first, limited to `limit` rows.
    pub fn recent(&self, limit: usize) -> Vec<&Entry> {
        let mut sorted: Vec<&Entry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted.truncate(limit);
        sorted
    }

    /// Sum of signed amounts: income minus expenses.
    pub fn balance(&self) -> f64 {
        self.entries.iter().map(Entry::signed_amount).sum()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether the log changed and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use hb_domain::EntryKind;

    use super::*;

    fn entry(day: u32, amount: f64) -> Entry {
        Entry::new(
            EntryKind::Expense,
            "home",
            NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            amount,
        )
    }

    #[test]
    fn append_and_remove_mark_dirty() {
        let mut log = EntryLog::default();
        assert!(!log.is_dirty());
        log.append(vec![entry(1, 10.0), entry(2, 5.0)]);
        assert!(log.take_dirty());
        assert!(!log.is_dirty());

        let id = log.entries()[0].id;
        let removed = log.remove(id).unwrap();
        assert_eq!(removed.amount, 10.0);
        assert_eq!(log.len(), 1);
        assert!(log.take_dirty());
    }

    #[test]
    fn removing_unknown_entry_fails() {
        let mut log = EntryLog::new(vec![entry(1, 1.0)]);
        let missing = Uuid::new_v4();
        assert!(matches!(log.remove(missing), Err(CoreError::EntryNotFound(id)) if id == missing));
        assert!(!log.is_dirty());
    }

    #[test]
    fn recent_sorts_newest_first() {
        let log = EntryLog::new(vec![entry(3, 1.0), entry(9, 2.0), entry(5, 3.0)]);
        let amounts: Vec<_> = log.recent(2).iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![2.0, 3.0]);
    }

    #[test]
    fn balance_nets_income_against_expenses() {
        let mut log = EntryLog::new(vec![entry(1, 40.0)]);
        log.append(vec![Entry::new(
            EntryKind::Income,
            "salary",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            100.0,
        )]);
        assert_eq!(log.balance(), 60.0);
    }

    #[test]
    fn prefix_resolution_finds_unique_entry() {
        let log = EntryLog::new(vec![entry(1, 1.0)]);
        let id = log.entries()[0].id;
        let prefix = &id.to_string()[..8];
        assert_eq!(log.resolve_prefix(prefix).unwrap(), id);
        assert!(log.resolve_prefix("").is_err());
    }

    #[test]
    fn prefix_resolution_accepts_the_simple_form() {
        let log = EntryLog::new(vec![entry(1, 1.0), entry(2, 2.0)]);
        let id = log.entries()[1].id;
        let simple = id.simple().to_string();
        assert_eq!(log.resolve_prefix(&simple[..12]).unwrap(), id);
        assert_eq!(log.resolve_prefix(&simple.to_uppercase()).unwrap(), id);
        assert_eq!(log.resolve_prefix(&id.to_string()).unwrap(), id);
    }
}
