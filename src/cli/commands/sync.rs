use meterbook_core::{PullOutcome, SyncService};

use super::settings::parse_switch;
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

const SYNC_USAGE: &str = "sync <test|push|pull|auto-pull on|off>";
const SYNC_URL_USAGE: &str = "sync-url [<url>|clear]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "sync",
            "Test, push to, or pull from the sync endpoint",
            SYNC_USAGE,
            cmd_sync,
        ),
        CommandEntry::new(
            "sync-url",
            "Show, set, or clear the sync endpoint",
            SYNC_URL_USAGE,
            cmd_sync_url,
        ),
    ]
}

fn cmd_sync(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(action) = args.first() else {
        return Err(CommandError::usage(SYNC_USAGE));
    };
    match action.to_ascii_lowercase().as_str() {
        "test" => {
            let transport = context.sync_transport()?;
            SyncService::test(&transport)?;
            output::success(format!("Sync endpoint {} is reachable.", transport.url()));
        }
        "push" => {
            let transport = context.sync_transport()?;
            SyncService::push(&transport, &context.store)?;
            output::success(format!(
                "Pushed {} customer(s) and {} reading(s).",
                context.store.customers.len(),
                context.store.reading_count()
            ));
        }
        "pull" => {
            let transport = context.sync_transport()?;
            match context.pull_remote(&transport)? {
                PullOutcome::Merged(keys) => {
                    output::success(format!("Pulled remote data ({}).", keys.join(", ")));
                    context.report_store_warnings();
                }
                PullOutcome::Empty => output::info("The endpoint has no saved data."),
            }
        }
        "auto-pull" => {
            let Some(value) = args.get(1) else {
                return Err(CommandError::usage(SYNC_USAGE));
            };
            let enabled = parse_switch(value)?;
            if enabled && context.config.sync_url.is_none() {
                return Err(CommandError::InvalidArguments(
                    "Set a sync URL before enabling auto-pull.".into(),
                ));
            }
            context.config.auto_pull = enabled;
            context.persist_config()?;
            output::success(format!(
                "Auto-pull {}.",
                if enabled { "enabled" } else { "disabled" }
            ));
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown sync action `{}`; {}",
                other, SYNC_USAGE
            )))
        }
    }
    Ok(())
}

fn cmd_sync_url(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        None => match &context.config.sync_url {
            Some(url) => output::info(format!("Sync URL: {}", url)),
            None => output::info("No sync URL configured."),
        },
        Some(value) if value.eq_ignore_ascii_case("clear") => {
            context.config.clear_sync_url();
            context.persist_config()?;
            output::success("Sync URL cleared.");
        }
        Some(value) => {
            context.config.set_sync_url(value)?;
            context.persist_config()?;
            output::success(format!("Sync URL set to {}.", value.trim()));
        }
    }
    Ok(())
}
