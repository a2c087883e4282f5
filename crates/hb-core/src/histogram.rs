//! Month buckets spanning a date range, for the "expenses over time" chart.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use hb_domain::{category_name, month_start, month_width_days, shift_month, DateRange, Entry};

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramMonth {
    /// Compact key such as `Jan2024`.
    pub id: String,
    pub date: NaiveDate,
    pub total: f64,
    pub sub_category: f64,
    pub width_days: i64,
    /// Display label such as `Jan 2024`.
    pub label: String,
    pub category_name: Option<String>,
}

/// Keyed by bucket start date so iteration stays chronological.
pub type MonthsMap = BTreeMap<NaiveDate, HistogramMonth>;

pub fn month_id(date: NaiveDate) -> String {
    date.format("%b%Y").to_string()
}

pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Creates an empty bucket for each month step from `range.from` while before `range.to`.
pub fn months_map(range: DateRange, selected_category: Option<&str>) -> MonthsMap {
    let category = selected_category.map(|id| category_name(id).unwrap_or(id).to_string());
    let mut months = MonthsMap::new();
    let mut step = 0;
    while let Some(date) = shift_month(range.from, step) {
        if date >= range.to {
            break;
        }
        months.insert(
            month_start(date),
            HistogramMonth {
                id: month_id(date),
                date,
                total: 0.0,
                sub_category: 0.0,
                width_days: month_width_days(date),
                label: month_label(date),
                category_name: category.clone(),
            },
        );
        step += 1;
    }
    months
}

/// Adds `entry` to its month bucket when the month is part of the map.
pub fn accumulate(months: &mut MonthsMap, entry: &Entry, selected_category: Option<&str>) {
    if let Some(bucket) = months.get_mut(&month_start(entry.date)) {
        bucket.total += entry.amount;
        if selected_category == Some(entry.category_id.as_str()) {
            bucket.sub_category += entry.amount;
        }
    }
}

/// Buckets expense entries by month across `range`, oldest first.
pub fn histogram(
    entries: &[Entry],
    range: DateRange,
    selected_category: Option<&str>,
) -> Vec<HistogramMonth> {
    let mut months = months_map(range, selected_category);
    for entry in entries.iter().filter(|entry| entry.is_expense()) {
        accumulate(&mut months, entry, selected_category);
    }
    months.into_values().collect()
}

#[cfg(test)]
mod tests {
    use hb_domain::EntryKind;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn months_map_spans_range() {
        let range = DateRange::new(date(2023, 11, 1), date(2024, 2, 1)).unwrap();
        let months = months_map(range, Some("tech"));
        let ids: Vec<_> = months.values().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["Nov2023", "Dec2023", "Jan2024"]);
        let first = months.values().next().unwrap();
        assert_eq!(first.label, "Nov 2023");
        assert_eq!(first.width_days, 30);
        assert_eq!(first.category_name.as_deref(), Some("Technology"));
    }

    #[test]
    fn histogram_accumulates_only_months_in_range() {
        let range = DateRange::year(2024).unwrap();
        let entries = vec![
            Entry::new(EntryKind::Expense, "tech", date(2024, 3, 2), 40.0),
            Entry::new(EntryKind::Expense, "home", date(2024, 3, 28), 10.0),
            Entry::new(EntryKind::Expense, "home", date(2023, 3, 28), 99.0),
            Entry::new(EntryKind::Income, "salary", date(2024, 3, 1), 500.0),
        ];
        let buckets = histogram(&entries, range, Some("tech"));
        assert_eq!(buckets.len(), 12);
        let march = &buckets[2];
        assert_eq!(march.id, "Mar2024");
        assert_eq!(march.total, 50.0);
        assert_eq!(march.sub_category, 40.0);
        assert_eq!(buckets.iter().map(|b| b.total).sum::<f64>(), 50.0);
    }
}
