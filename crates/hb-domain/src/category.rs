//! Static category reference data used to classify entries.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::common::ParseEnumError;

/// Classifies whether a category (or an entry) adds to or subtracts from the balance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[serde(alias = "inc")]
    Income,
    #[default]
    #[serde(alias = "exp")]
    Expense,
}

impl EntryKind {
    /// Applies the balance sign for this kind to a positive amount.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            EntryKind::Income => amount,
            EntryKind::Expense => -amount,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Income => "Income",
            EntryKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

impl FromStr for EntryKind {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "inc" => Ok(EntryKind::Income),
            "expense" | "exp" => Ok(EntryKind::Expense),
            other => Err(ParseEnumError::new("entry kind", other)),
        }
    }
}

/// A fixed spending or income classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: EntryKind,
}

impl Category {
    const fn expense(id: &'static str, name: &'static str) -> Self {
        Self {
            id,
            name,
            kind: EntryKind::Expense,
        }
    }

    const fn income(id: &'static str, name: &'static str) -> Self {
        Self {
            id,
            name,
            kind: EntryKind::Income,
        }
    }
}

/// Ids are persisted alongside entries and must stay stable.
pub const CATEGORIES: &[Category] = &[
    Category::expense("children", "Children"),
    Category::expense("debt", "Debt"),
    Category::expense("education", "Education"),
    Category::expense("entertainment", "Entertainment"),
    Category::expense("gifts", "Gifts"),
    Category::expense("health", "Health/medical"),
    Category::expense("home", "Home"),
    Category::expense("insurance", "Insurance"),
    Category::expense("pets", "Pets"),
    Category::expense("tech", "Technology"),
    Category::expense("transportation", "Transportation"),
    Category::expense("travel", "Travel"),
    Category::expense("utilities", "Utilities"),
    Category::income("salary", "Salary"),
    Category::income("investments", "Investments"),
    Category::income("other-income", "Other income"),
];

/// Older data files spell the utilities category `utilites`.
const LEGACY_ALIASES: &[(&str, &str)] = &[("utilites", "utilities")];

pub fn categories() -> &'static [Category] {
    CATEGORIES
}

/// Categories applicable to the given entry kind, in display order.
pub fn categories_for(kind: EntryKind) -> impl Iterator<Item = &'static Category> {
    CATEGORIES.iter().filter(move |category| category.kind == kind)
}

/// Maps legacy ids onto their current spelling.
pub fn canonical_category_id(id: &str) -> &str {
    LEGACY_ALIASES
        .iter()
        .find(|(legacy, _)| *legacy == id)
        .map(|(_, current)| *current)
        .unwrap_or(id)
}

pub fn find_category(id: &str) -> Option<&'static Category> {
    let id = canonical_category_id(id.trim());
    CATEGORIES.iter().find(|category| category.id == id)
}

/// Resolves a category by id or, failing that, by case-insensitive display name.
pub fn lookup_category(needle: &str) -> Option<&'static Category> {
    find_category(needle).or_else(|| {
        let needle = needle.trim();
        CATEGORIES
            .iter()
            .find(|category| category.name.eq_ignore_ascii_case(needle))
    })
}

pub fn category_name(id: &str) -> Option<&'static str> {
    find_category(id).map(|category| category.name)
}
