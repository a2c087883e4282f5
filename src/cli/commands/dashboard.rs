use hb_core::{histogram, CoreError, DashboardService, HistogramMonth};
use hb_domain::{lookup_category, month_start, DateRange};

use crate::cli::core::{parse_date, usage_error, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::{style::UiStyle, Table, TableColumn, TableRenderer};

const RANGE_USAGE: &str = "range [<from> <to> | year <YYYY>]";
const BAR_WIDTH: f64 = 30.0;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "range",
            "Show or set the dashboard date range (end exclusive)",
            RANGE_USAGE,
            cmd_range,
        ),
        CommandEntry::new(
            "select",
            "Highlight a category in the timeline",
            "select [<category> | clear]",
            cmd_select,
        ),
        CommandEntry::new(
            "dashboard",
            "Summarize expenses in the range",
            "dashboard",
            cmd_dashboard,
        ),
        CommandEntry::new(
            "histogram",
            "Chart monthly expenses across the range",
            "histogram",
            cmd_histogram,
        ),
    ]
}

fn cmd_range(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let range = match args {
        [] => {
            output::info(format!("Range: {}", context.range));
            return Ok(());
        }
        ["year", year] => {
            let year: i32 = year
                .parse()
                .map_err(|_| CommandError::InvalidArguments(format!("invalid year `{year}`")))?;
            DateRange::year(year).map_err(CoreError::from)?
        }
        [from, to] => DateRange::new(parse_date(from)?, parse_date(to)?).map_err(CoreError::from)?,
        _ => return Err(usage_error(RANGE_USAGE)),
    };
    context.range = range;
    output::success(format!("Range set to {}", range));
    Ok(())
}

fn cmd_select(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => match &context.selected_category {
            Some(id) => output::info(format!("Selected category: {id}")),
            None => output::info("No category selected."),
        },
        ["clear"] => {
            context.selected_category = None;
            output::success("Category selection cleared.");
        }
        [needle] => {
            let category = lookup_category(needle)
                .ok_or_else(|| CoreError::CategoryNotFound(needle.to_string()))?;
            context.selected_category = Some(category.id.to_string());
            output::success(format!("Selected {}", category.name));
        }
        _ => return Err(usage_error("select [<category> | clear]")),
    }
    Ok(())
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let selected = context.selected_category.as_deref();
    let dashboard = DashboardService::build(context.log.entries(), context.range, selected);
    let fmt = &context.formatters;
    let style = UiStyle::detect();

    output::section(format!("Dashboard {}", dashboard.range));
    output::two_column(&[
        ("Expenses", dashboard.entries.len().to_string()),
        ("Total", fmt.amount(dashboard.total)),
    ]);
    if dashboard.entries.is_empty() {
        output::info("No expenses in this range.");
    } else {
        let mut pie = Table::new(
            Some("By category"),
            vec![
                TableColumn::new("Category", 8),
                TableColumn::right("Amount", 8),
                TableColumn::right("Share", 6),
            ],
        );
        for slice in &dashboard.pie {
            let share = if dashboard.total > 0.0 {
                slice.amount / dashboard.total * 100.0
            } else {
                0.0
            };
            pie.add_row(vec![
                slice.name.clone(),
                fmt.number(slice.amount),
                format!("{share:.1}%"),
            ]);
        }
        println!();
        TableRenderer::render(&pie, &style);
    }

    if dashboard.monthly.is_empty() {
        return Ok(());
    }
    let selected_header = selected.unwrap_or("Selected");
    let mut timeline = Table::new(
        Some("Timeline"),
        vec![
            TableColumn::new("Month", 8),
            TableColumn::right("Total", 8),
            TableColumn::right(selected_header, 8),
            TableColumn::new("", 1),
        ],
    );
    let from = month_start(dashboard.range.from);
    for month in &dashboard.monthly {
        let in_range = month.month >= from && month.month < dashboard.range.to;
        timeline.add_row(vec![
            month.month.format("%b %Y").to_string(),
            fmt.number(month.total),
            fmt.number(month.category_total),
            if in_range { "*".into() } else { String::new() },
        ]);
    }
    println!();
    TableRenderer::render(&timeline, &style);
    Ok(())
}

fn cmd_histogram(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let selected = context.selected_category.as_deref();
    let buckets = histogram(context.log.entries(), context.range, selected);
    if buckets.is_empty() {
        output::info("The range does not cover a month start.");
        return Ok(());
    }

    let max = buckets.iter().map(|bucket| bucket.total).fold(0.0, f64::max);
    let mut table = Table::new(
        Some(format!("Expenses over time {}", context.range)),
        vec![
            TableColumn::new("Month", 8),
            TableColumn::right("Total", 8),
            TableColumn::right(
                buckets[0].category_name.as_deref().unwrap_or("Selected"),
                8,
            ),
            TableColumn::new("", 1),
        ],
    );
    for bucket in &buckets {
        table.add_row(vec![
            bucket.label.clone(),
            context.formatters.number(bucket.total),
            context.formatters.number(bucket.sub_category),
            bar(bucket, max),
        ]);
    }
    TableRenderer::render(&table, &UiStyle::detect());
    Ok(())
}

/// `#` for the selected category's share, `=` for the rest of the month.
fn bar(bucket: &HistogramMonth, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let total = (bucket.total / max * BAR_WIDTH).round() as usize;
    let selected = ((bucket.sub_category / max * BAR_WIDTH).round() as usize).min(total);
    format!("{}{}", "#".repeat(selected), "=".repeat(total - selected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bucket(total: f64, sub_category: f64) -> HistogramMonth {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        HistogramMonth {
            id: "Jan2024".into(),
            date,
            total,
            sub_category,
            width_days: 31,
            label: "Jan 2024".into(),
            category_name: None,
        }
    }

    #[test]
    fn bars_scale_to_the_largest_month() {
        assert_eq!(bar(&bucket(100.0, 0.0), 100.0).len(), 30);
        assert_eq!(bar(&bucket(50.0, 25.0), 100.0), format!("{}{}", "#".repeat(8), "=".repeat(7)));
        assert_eq!(bar(&bucket(0.0, 0.0), 0.0), "");
    }
}
