use std::str::FromStr;

use hb_domain::{categories, Category, EntryKind};

use crate::cli::core::{usage_error, CommandError, CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;
use crate::cli::ui::{style::UiStyle, Table, TableColumn, TableRenderer};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "categories",
        "List entry categories",
        "categories [income|expense]",
        cmd_categories,
    )]
}

fn cmd_categories(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind = match args {
        [] => None,
        [kind] => Some(EntryKind::from_str(kind).map_err(|err| {
            CommandError::InvalidArguments(err.to_string())
        })?),
        _ => return Err(usage_error("categories [income|expense]")),
    };

    let mut table = Table::new(
        Some("Categories"),
        vec![
            TableColumn::new("Id", 8),
            TableColumn::new("Name", 12),
            TableColumn::new("Kind", 7),
        ],
    );
    for category in categories()
        .iter()
        .filter(|category| kind.map_or(true, |kind| category.kind == kind))
    {
        table.add_row(row(category, context.selected_category.as_deref()));
    }
    TableRenderer::render(&table, &UiStyle::detect());
    Ok(())
}

fn row(category: &Category, selected: Option<&str>) -> Vec<String> {
    let marker = if selected == Some(category.id) { " *" } else { "" };
    vec![
        format!("{}{}", category.id, marker),
        category.name.to_string(),
        category.kind.to_string(),
    ]
}
