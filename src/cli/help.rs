use crate::cli::output::{self, section as output_section};
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    output_section("Available commands");
    for entry in registry.list() {
        println!("  {:<12} {}", entry.name, entry.description);
    }
    output::hint("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry) {
    output_section(format!("Help: {}", entry.name));
    output::two_column(&[
        ("Description", entry.description.to_string()),
        ("Usage", entry.usage.to_string()),
    ]);
}
