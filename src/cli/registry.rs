use std::collections::BTreeMap;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Topic a command is listed under in `help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommandGroup {
    Customers,
    Readings,
    Billing,
    Settings,
    Sync,
    Session,
}

impl CommandGroup {
    pub fn title(self) -> &'static str {
        match self {
            CommandGroup::Customers => "Customers",
            CommandGroup::Readings => "Readings",
            CommandGroup::Billing => "Billing",
            CommandGroup::Settings => "Settings",
            CommandGroup::Sync => "Sync",
            CommandGroup::Session => "Session",
        }
    }
}

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

/// Shell commands. Names are unique; a later registration under an
/// existing name replaces the handler but keeps the original slot.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<(CommandGroup, CommandEntry)>,
    index: BTreeMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_group(&mut self, group: CommandGroup, entries: Vec<CommandEntry>) {
        for entry in entries {
            match self.index.get(entry.name) {
                Some(&slot) => self.entries[slot] = (group, entry),
                None => {
                    self.index.insert(entry.name, self.entries.len());
                    self.entries.push((group, entry));
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        let slot = *self.index.get(name.trim().to_lowercase().as_str())?;
        self.entries.get(slot).map(|(_, entry)| entry)
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(_, entry)| entry.name)
    }

    /// Entries bucketed by group, each bucket in registration order.
    pub fn grouped(&self) -> Vec<(CommandGroup, Vec<&CommandEntry>)> {
        let mut buckets: BTreeMap<CommandGroup, Vec<&CommandEntry>> = BTreeMap::new();
        for (group, entry) in &self.entries {
            buckets.entry(*group).or_default().push(entry);
        }
        buckets.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut ShellContext, _: &[&str]) -> CommandResult {
        Ok(())
    }

    fn other(_: &mut ShellContext, _: &[&str]) -> CommandResult {
        Err(crate::cli::core::CommandError::ExitRequested)
    }

    #[test]
    fn lookup_ignores_case_and_padding() {
        let mut registry = CommandRegistry::new();
        registry.register_group(
            CommandGroup::Billing,
            vec![CommandEntry::new("summary", "Totals", "summary", noop)],
        );
        assert!(registry.get(" Summary ").is_some());
        assert!(registry.get("sum").is_none());
    }

    #[test]
    fn reregistering_replaces_in_place() {
        let mut registry = CommandRegistry::new();
        registry.register_group(
            CommandGroup::Session,
            vec![
                CommandEntry::new("help", "Help", "help", noop),
                CommandEntry::new("exit", "Leave", "exit", noop),
            ],
        );
        registry.register_group(
            CommandGroup::Session,
            vec![CommandEntry::new("help", "More help", "help [command]", other)],
        );

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["help", "exit"]);
        assert_eq!(registry.get("help").map(|e| e.usage), Some("help [command]"));
    }

    #[test]
    fn groups_follow_topic_order() {
        let mut registry = CommandRegistry::new();
        registry.register_group(
            CommandGroup::Sync,
            vec![CommandEntry::new("sync", "Sync", "sync", noop)],
        );
        registry.register_group(
            CommandGroup::Customers,
            vec![
                CommandEntry::new("customers", "List", "customers", noop),
                CommandEntry::new("add-customer", "Add", "add-customer", noop),
            ],
        );

        let grouped = registry.grouped();
        let titles: Vec<_> = grouped.iter().map(|(group, _)| group.title()).collect();
        assert_eq!(titles, vec!["Customers", "Sync"]);
        let names: Vec<_> = grouped[0].1.iter().map(|entry| entry.name).collect();
        assert_eq!(names, vec!["customers", "add-customer"]);
    }
}
