//! Domain model for a single income or expense record.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::category::{canonical_category_id, category_name, EntryKind};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(deserialize_with = "deserialize_entry_id")]
    pub id: Uuid,
    #[serde(deserialize_with = "deserialize_entry_date")]
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(deserialize_with = "deserialize_category_id")]
    pub category_id: String,
    #[serde(default, alias = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entry {
    pub fn new(
        kind: EntryKind,
        category_id: impl Into<String>,
        date: NaiveDate,
        amount: f64,
    ) -> Self {
        let category_id = category_id.into();
        Self {
            id: Uuid::new_v4(),
            date,
            amount,
            category_id: canonical_category_id(&category_id).to_string(),
            kind,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Amount with the balance sign of the entry kind applied.
    pub fn signed_amount(&self) -> f64 {
        self.kind.signed(self.amount)
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    pub fn category_name(&self) -> &str {
        category_name(&self.category_id).unwrap_or(self.category_id.as_str())
    }
}

/// Short non-UUID ids from older files map onto a stable v5 UUID.
fn deserialize_entry_id<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(entry_id_from_str(&raw))
}

pub fn entry_id_from_str(raw: &str) -> Uuid {
    let raw = raw.trim();
    Uuid::parse_str(raw).unwrap_or_else(|_| Uuid::new_v5(&Uuid::NAMESPACE_OID, raw.as_bytes()))
}

/// Accepts plain `YYYY-MM-DD` dates as well as full RFC 3339 timestamps.
fn deserialize_entry_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_entry_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid entry date `{raw}`")))
}

fn deserialize_category_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(canonical_category_id(&raw).to_string())
}

/// Parses the date formats found in stored entry files.
///
/// Timestamps hold local midnight written out in UTC, so they are read back
/// in the local time zone.
pub fn parse_entry_date(raw: &str) -> Option<NaiveDate> {
    parse_entry_date_in(raw, &Local)
}

pub fn parse_entry_date_in<Tz: TimeZone>(raw: &str, zone: &Tz) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(zone).date_naive())
    })
}
