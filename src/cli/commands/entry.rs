use std::str::FromStr;

use dialoguer::{Confirm, Input, Select};

use hb_core::{CoreError, EntryForm, SaveOutcome};
use hb_domain::{lookup_category, Entry, EntryKind, Repeat};

use crate::cli::core::{
    parse_amount, parse_date, short_id, usage_error, CliMode, CommandError, CommandResult,
    ParsedArgs, ShellContext,
};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::{style::UiStyle, Table, TableColumn, TableRenderer};

const ADD_USAGE: &str =
    "add <income|expense> <category> <amount...> [--date D] [--repeat R] [--until D] [--note TEXT]";
const DEFAULT_LOG_LIMIT: usize = 20;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add", "Record income or expenses", ADD_USAGE, cmd_add),
        CommandEntry::new("log", "Show recent entries", "log [limit]", cmd_log),
        CommandEntry::new("remove", "Delete an entry", "remove <id-prefix>", cmd_remove),
        CommandEntry::new("balance", "Show income minus expenses", "balance", cmd_balance),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() && context.mode == CliMode::Interactive {
        return add_interactive(context);
    }

    let parsed = ParsedArgs::parse(args, &["date", "repeat", "until", "note"])?;
    let [kind, category, amounts @ ..] = parsed.positional.as_slice() else {
        return Err(usage_error(ADD_USAGE));
    };
    if amounts.is_empty() {
        return Err(usage_error(ADD_USAGE));
    }

    let kind = EntryKind::from_str(kind).map_err(CoreError::from)?;
    let category =
        lookup_category(category).ok_or_else(|| CoreError::CategoryNotFound(category.to_string()))?;

    let today = context.clock.today();
    let mut form = EntryForm::new(kind, today);
    form.select_category(category.id, today)?;

    let mut index = 0;
    for (position, raw) in amounts.iter().enumerate() {
        if position > 0 {
            index = form.add_line_after(index)?;
        }
        form.set_amount(index, Some(parse_amount(raw)?))?;
        form.set_description(index, parsed.option("note").map(str::to_string))?;
    }

    if let Some(date) = parsed.option("date") {
        form.set_date(parse_date(date)?);
    }
    if let Some(repeat) = parsed.option("repeat") {
        form.set_repeat(Repeat::from_str(repeat).map_err(CoreError::from)?);
    }
    if let Some(until) = parsed.option("until") {
        form.set_until(Some(parse_date(until)?));
    }

    save_form(context, &form)
}

fn add_interactive(context: &mut ShellContext) -> CommandResult {
    let kinds = [EntryKind::Expense, EntryKind::Income];
    let kind_index = Select::with_theme(&context.theme)
        .with_prompt("Entry kind")
        .items(&kinds)
        .default(0)
        .interact()?;

    let today = context.clock.today();
    let mut form = EntryForm::new(kinds[kind_index], today);
    let categories = form.available_categories();
    let labels: Vec<&str> = categories.iter().map(|category| category.name).collect();
    let category_index = Select::with_theme(&context.theme)
        .with_prompt("Category")
        .items(&labels)
        .default(0)
        .interact()?;
    form.select_category(categories[category_index].id, today)?;

    let mut index = 0;
    loop {
        let amount: f64 = Input::with_theme(&context.theme)
            .with_prompt("Amount")
            .validate_with(|value: &f64| -> Result<(), &str> {
                if *value > 0.0 && value.is_finite() {
                    Ok(())
                } else {
                    Err("Amount must be greater than 0")
                }
            })
            .interact_text()?;
        form.set_amount(index, Some(amount))?;
        let note: String = Input::with_theme(&context.theme)
            .with_prompt("Note (optional)")
            .allow_empty(true)
            .interact_text()?;
        form.set_description(index, Some(note))?;

        let another = Confirm::with_theme(&context.theme)
            .with_prompt("Add another amount in this category?")
            .default(false)
            .interact()?;
        if !another {
            break;
        }
        index = form.add_line_after(index)?;
    }

    let date: String = Input::with_theme(&context.theme)
        .with_prompt("Date (YYYY-MM-DD)")
        .with_initial_text(today.to_string())
        .interact_text()?;
    form.set_date(parse_date(&date)?);

    let options = Repeat::options();
    let labels: Vec<&str> = options.iter().map(|(_, label)| *label).collect();
    let repeat_index = Select::with_theme(&context.theme)
        .with_prompt("Repeat")
        .items(&labels)
        .default(0)
        .interact()?;
    let repeat = options[repeat_index].0;
    form.set_repeat(repeat);
    if !repeat.is_once() {
        let until: String = Input::with_theme(&context.theme)
            .with_prompt("Repeat until (YYYY-MM-DD)")
            .interact_text()?;
        form.set_until(Some(parse_date(&until)?));
    }

    save_form(context, &form)
}

fn save_form(context: &mut ShellContext, form: &EntryForm) -> CommandResult {
    let SaveOutcome {
        entries,
        balance_delta,
    } = form.save()?;
    let added = context.log.append(entries);
    output::success(format!(
        "Saved {} {} (balance {})",
        added,
        if added == 1 { "entry" } else { "entries" },
        signed(context, balance_delta)
    ));
    Ok(())
}

fn cmd_log(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args {
        [] => DEFAULT_LOG_LIMIT,
        [raw] => raw
            .parse::<usize>()
            .map_err(|_| CommandError::InvalidArguments(format!("invalid limit `{raw}`")))?,
        _ => return Err(usage_error("log [limit]")),
    };

    if context.log.is_empty() {
        output::info("No entries recorded yet.");
        return Ok(());
    }

    let mut table = Table::new(
        Some(format!("Entries ({} total)", context.log.len())),
        vec![
            TableColumn::new("Id", 8),
            TableColumn::new("Date", 10),
            TableColumn::new("Category", 8),
            TableColumn::right("Amount", 8),
            TableColumn::new("Note", 4),
        ],
    );
    for entry in context.log.recent(limit) {
        table.add_row(entry_row(context, entry));
    }
    TableRenderer::render(&table, &UiStyle::detect());
    Ok(())
}

fn entry_row(context: &ShellContext, entry: &Entry) -> Vec<String> {
    vec![
        short_id(entry.id),
        context.formatters.date(entry.date),
        entry.category_name().to_string(),
        context.formatters.number(entry.signed_amount()),
        entry.description.clone().unwrap_or_default(),
    ]
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [prefix] = args else {
        return Err(usage_error("remove <id-prefix>"));
    };
    let id = context.log.resolve_prefix(prefix)?;
    let removed = context.log.remove(id)?;
    output::success(format!(
        "Removed {} {} on {} ({})",
        removed.category_name(),
        removed.kind.to_string().to_lowercase(),
        context.formatters.date(removed.date),
        context.formatters.amount(removed.amount)
    ));
    Ok(())
}

fn cmd_balance(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let mut income = 0.0;
    let mut expenses = 0.0;
    for entry in context.log.entries() {
        match entry.kind {
            EntryKind::Income => income += entry.amount,
            EntryKind::Expense => expenses += entry.amount,
        }
    }
    output::two_column(&[
        ("Income", context.formatters.amount(income)),
        ("Expenses", context.formatters.amount(expenses)),
        ("Balance", context.formatters.amount(context.log.balance())),
    ]);
    Ok(())
}

fn signed(context: &ShellContext, amount: f64) -> String {
    let formatted = context.formatters.amount(amount);
    if amount > 0.0 {
        format!("+{formatted}")
    } else {
        formatted
    }
}
