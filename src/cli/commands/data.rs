use hb_core::{CoreError, EntryLog, EntryStorage};

use crate::cli::core::{usage_error, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::{style::UiStyle, Table, TableColumn, TableRenderer};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "backup",
            "Snapshot the entry file",
            "backup [note]",
            cmd_backup,
        ),
        CommandEntry::new("backups", "List entry backups", "backups", cmd_backups),
        CommandEntry::new(
            "restore",
            "Replace entries with a backup",
            "restore <index>",
            cmd_restore,
        ),
        CommandEntry::new(
            "seed",
            "Append generated sample expenses",
            "seed [count]",
            cmd_seed,
        ),
    ]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = args.join(" ");
    let info = context
        .storage
        .backup(Some(note.as_str()).filter(|note| !note.trim().is_empty()))?;
    output::success(format!("Backup created: {}", info.id));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.storage.list_backups()?;
    if backups.is_empty() {
        output::info("No backups yet.");
        return Ok(());
    }
    let mut table = Table::new(
        Some("Backups (newest first)"),
        vec![
            TableColumn::right("#", 2),
            TableColumn::new("Created", 19),
            TableColumn::new("File", 8),
        ],
    );
    for (index, backup) in backups.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            backup.created_at.clone(),
            backup.id.clone(),
        ]);
    }
    TableRenderer::render(&table, &UiStyle::detect());
    output::hint("Use `restore <#>` to bring one back.");
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(usage_error("restore <index>"));
    };
    let index: usize = raw
        .parse()
        .ok()
        .filter(|index| *index > 0)
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid backup index `{raw}`")))?;

    let backups = context.storage.list_backups()?;
    let backup = backups.get(index - 1).ok_or_else(|| {
        CoreError::InvalidOperation(format!(
            "backup #{index} does not exist ({} available)",
            backups.len()
        ))
    })?;
    let entries = context.storage.restore_backup(backup)?;
    let count = entries.len();
    // The storage already wrote the restored file.
    context.log = EntryLog::new(entries);
    output::success(format!("Restored {count} entries from {}", backup.id));
    Ok(())
}

fn cmd_seed(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let count = match args {
        [] => context.config.sample_size,
        [raw] => raw
            .parse()
            .map_err(|_| CommandError::InvalidArguments(format!("invalid count `{raw}`")))?,
        _ => return Err(usage_error("seed [count]")),
    };
    let today = context.clock.today();
    let entries = context.sample_generator().generate(count, today);
    let added = context.log.append(entries);
    output::success(format!("Added {added} sample entries."));
    Ok(())
}
