//! Range-filtered totals, per-category slices, and the monthly timeline.

use std::{cmp::Ordering, collections::BTreeMap};

use chrono::NaiveDate;
use tracing::debug;

use hb_domain::{category_name, month_start, month_width_days, DateRange, Entry};

/// Total spent in one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthTotal {
    /// First day of the month.
    pub month: NaiveDate,
    pub total: f64,
    /// Portion of `total` belonging to the selected category.
    pub category_total: f64,
    pub width_days: i64,
}

/// Amount spent in one category within the active range.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySlice {
    pub id: String,
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub range: DateRange,
    pub selected_category: Option<String>,
    pub entries: Vec<Entry>,
    pub total: f64,
    pub monthly: Vec<MonthTotal>,
    pub pie: Vec<CategorySlice>,
}

pub struct DashboardService;

impl DashboardService {
    /// Aggregates expense entries for the dashboard.
    ///
    /// `monthly` covers every month that has an expense, regardless of the
    /// range, so the timeline can be used to pick a new range.
    pub fn build(entries: &[Entry], range: DateRange, selected_category: Option<&str>) -> Dashboard {
        let mut monthly: BTreeMap<NaiveDate, MonthTotal> = BTreeMap::new();
        let mut total = 0.0;
        let mut active = Vec::new();

        for entry in entries.iter().filter(|entry| entry.is_expense()) {
            let month = month_start(entry.date);
            let bucket = monthly.entry(month).or_insert_with(|| MonthTotal {
                month,
                total: 0.0,
                category_total: 0.0,
                width_days: month_width_days(month),
            });
            bucket.total += entry.amount;
            if selected_category == Some(entry.category_id.as_str()) {
                bucket.category_total += entry.amount;
            }

            if range.contains(entry.date) {
                total += entry.amount;
                active.push(entry.clone());
            }
        }

        let pie = Self::category_slices(&active);
        debug!(
            %range,
            active = active.len(),
            months = monthly.len(),
            categories = pie.len(),
            "dashboard aggregated"
        );

        Dashboard {
            range,
            selected_category: selected_category.map(str::to_string),
            entries: active,
            total,
            monthly: monthly.into_values().collect(),
            pie,
        }
    }

    /// Sums amounts per category, largest first.
    pub fn category_slices(entries: &[Entry]) -> Vec<CategorySlice> {
        let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
        for entry in entries {
            *by_category.entry(entry.category_id.as_str()).or_default() += entry.amount;
        }

        let mut slices: Vec<CategorySlice> = by_category
            .into_iter()
            .map(|(id, amount)| CategorySlice {
                id: id.to_string(),
                name: category_name(id).unwrap_or(id).to_string(),
                amount,
            })
            .collect();
        slices.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        slices
    }
}
