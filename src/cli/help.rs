use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::table::{Table, TableColumn};

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    for (group, entries) in registry.grouped() {
        output::block(format!("{}:", group.title()));
        let mut table = Table::new(vec![
            TableColumn::left("Command"),
            TableColumn::left("Description"),
        ]);
        for entry in entries {
            table.push(vec![entry.name.to_string(), entry.description.to_string()]);
        }
        output::block(table.render());
    }
    output::hint("Use `help <command>` for usage details.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(format!("Help: {}", entry.name));
    output::block(format!("  {}", entry.description));
    output::block(format!("  usage: {}", entry.usage));
}
