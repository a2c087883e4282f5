//! Entry form state, validation, and conversion into stored entries.

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use hb_domain::{categories_for, find_category, Category, Entry, EntryKind, Repeat};

use crate::{recurrence::repeat_dates, CoreError};

/// One amount row of the entry form, bound to a category.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryLine {
    pub id: Uuid,
    pub category_id: String,
    pub amount: Option<f64>,
    pub description: Option<String>,
}

impl EntryLine {
    pub fn blank(category_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id: category_id.into(),
            amount: None,
            description: None,
        }
    }

    fn has_positive_amount(&self) -> bool {
        self.amount.is_some_and(|amount| amount > 0.0)
    }
}

/// Result of saving a form: the entries to append plus the balance change.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub entries: Vec<Entry>,
    pub balance_delta: f64,
}

/// Mutable state behind the "add entry" page.
#[derive(Debug, Clone)]
pub struct EntryForm {
    pub kind: EntryKind,
    pub date: NaiveDate,
    pub repeat: Repeat,
    pub until: Option<NaiveDate>,
    pub lines: Vec<EntryLine>,
}

impl EntryForm {
    pub fn new(kind: EntryKind, date: NaiveDate) -> Self {
        Self {
            kind,
            date,
            repeat: Repeat::Once,
            until: None,
            lines: Vec::new(),
        }
    }

    /// Categories the form offers for its entry kind.
    pub fn available_categories(&self) -> Vec<&'static Category> {
        categories_for(self.kind).collect()
    }

    /// Switches to `category_id`, resetting lines, date, and repeat settings.
    pub fn select_category(&mut self, category_id: &str, today: NaiveDate) -> Result<(), CoreError> {
        let category = find_category(category_id)
            .filter(|category| category.kind == self.kind)
            .ok_or_else(|| CoreError::CategoryNotFound(category_id.to_string()))?;
        self.lines = vec![EntryLine::blank(category.id)];
        self.date = today;
        self.until = None;
        self.repeat = Repeat::Once;
        Ok(())
    }

    /// Inserts a blank copy of line `index` directly after it, returning the new index.
    pub fn add_line_after(&mut self, index: usize) -> Result<usize, CoreError> {
        let source = self
            .lines
            .get(index)
            .ok_or_else(|| CoreError::InvalidOperation(format!("no entry line at {index}")))?;
        let line = EntryLine {
            id: Uuid::new_v4(),
            amount: None,
            ..source.clone()
        };
        self.lines.insert(index + 1, line);
        Ok(index + 1)
    }

    pub fn set_amount(&mut self, index: usize, amount: Option<f64>) -> Result<(), CoreError> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or_else(|| CoreError::InvalidOperation(format!("no entry line at {index}")))?;
        line.amount = amount;
        Ok(())
    }

    pub fn set_description(
        &mut self,
        index: usize,
        description: Option<String>,
    ) -> Result<(), CoreError> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or_else(|| CoreError::InvalidOperation(format!("no entry line at {index}")))?;
        line.description = description.filter(|text| !text.trim().is_empty());
        Ok(())
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn set_repeat(&mut self, repeat: Repeat) {
        self.repeat = repeat;
    }

    pub fn set_until(&mut self, until: Option<NaiveDate>) {
        self.until = until;
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.lines.iter().any(EntryLine::has_positive_amount) {
            return Err(CoreError::Validation(
                "at least one amount must be greater than zero".into(),
            ));
        }
        if self.repeat.is_once() {
            return Ok(());
        }
        match self.until {
            Some(until) if until > self.date => Ok(()),
            Some(_) => Err(CoreError::Validation(
                "repeat end date must be after the entry date".into(),
            )),
            None => Err(CoreError::Validation(format!(
                "{} entries need an end date",
                self.repeat
            ))),
        }
    }

    /// Expands every line with a positive amount into entries, including repeats.
    pub fn save(&self) -> Result<SaveOutcome, CoreError> {
        self.validate()?;

        let follow_ups = match (self.repeat, self.until) {
            (repeat, Some(until)) if !repeat.is_once() => repeat_dates(self.date, repeat, until),
            _ => Vec::new(),
        };

        let mut entries = Vec::new();
        let mut sum = 0.0;
        for line in self.lines.iter().filter(|line| line.has_positive_amount()) {
            let amount = line.amount.unwrap_or_default();
            sum += amount;
            for date in std::iter::once(self.date).chain(follow_ups.iter().copied()) {
                let mut entry = Entry::new(self.kind, line.category_id.clone(), date, amount);
                entry.description = line.description.clone();
                entries.push(entry);
            }
            debug!(
                category = %line.category_id,
                amount,
                repeats = follow_ups.len(),
                "expanded entry line"
            );
        }

        let balance_delta = self.kind.signed(sum);
        info!(
            kind = %self.kind,
            count = entries.len(),
            balance_delta,
            "entry form saved"
        );
        Ok(SaveOutcome {
            entries,
            balance_delta,
        })
    }
}
