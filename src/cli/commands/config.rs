use hb_config::Config;

use crate::cli::core::{usage_error, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "config [show | set <key> <value>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change preferences",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => show(context),
        ["set", key, value @ ..] if !value.is_empty() => set(context, key, &value.join(" ")),
        _ => Err(usage_error(USAGE)),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    let rows = Config::KEYS
        .iter()
        .map(|key| Ok((*key, context.config.get(key)?)))
        .collect::<Result<Vec<_>, CommandError>>()?;
    output::two_column(&rows);
    output::hint(format!(
        "Stored in {}",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn set(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut config = context.config.clone();
    config.set(key, value)?;
    context.apply_config(config)?;
    output::success(format!("{key} = {}", context.config.get(key)?));
    Ok(())
}
