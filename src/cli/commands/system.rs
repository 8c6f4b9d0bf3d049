use meterbook_core::storage::StoreStorage;
use meterbook_domain::MeterStore;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::help;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::cli::table::{Table, TableColumn};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "backups",
            "List store backups or restore one",
            "backups [restore <n>]",
            cmd_backups,
        ),
        CommandEntry::new(
            "warnings",
            "Check the store for inconsistent data",
            "warnings",
            cmd_warnings,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_backups(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let backups = context.storage.list_backups()?;
    match args {
        [] => {
            if backups.is_empty() {
                output::info("No backups yet. One is kept each time the store is saved.");
                return Ok(());
            }
            output::section("Backups");
            let mut table = Table::new(vec![
                TableColumn::right("#"),
                TableColumn::left("Created"),
                TableColumn::left("File"),
            ]);
            for (index, backup) in backups.iter().enumerate() {
                table.push(vec![
                    (index + 1).to_string(),
                    backup.created_at.clone(),
                    backup.id.clone(),
                ]);
            }
            output::block(table.render());
            Ok(())
        }
        [action, position] if action.eq_ignore_ascii_case("restore") => {
            let backup = position
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|index| backups.get(index))
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "no backup number `{}`; see `backups`",
                        position
                    ))
                })?;
            if !context.confirm(&format!("Replace the current store with {}?", backup.id))? {
                output::info("Store kept.");
                return Ok(());
            }
            context.store = context.storage.restore_backup(backup)?;
            output::success(format!("Restored {}.", backup.id));
            Ok(())
        }
        _ => Err(CommandError::usage("backups [restore <n>]")),
    }
}

fn cmd_warnings(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.report_store_warnings() == 0 {
        output::success("No problems found.");
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("meterbook {}", meta.version));
    output::block(format!("  CLI version  : {}", build_info::CLI_VERSION));
    output::block(format!(
        "  Store schema : v{}",
        MeterStore::schema_version_default()
    ));
    output::block(format!(
        "  Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    output::block(format!("  Built at     : {}", meta.timestamp));
    output::block(format!("  Target       : {}", meta.target));
    output::block(format!("  Profile      : {}", meta.profile));
    output::block(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first().map(|name| name.to_lowercase()) {
        match context.command(&name) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(args[0]),
        }
        return Ok(());
    }
    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

