use uuid::Uuid;

use meterbook_core::{CommandOutcome, HistoryEntry, ReadingService, StoreCommand};

use crate::cli::core::{parse_amount, parse_date, parse_kind, CommandError, CommandResult};
use crate::cli::formatters::short_id;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::cli::table::{Table, TableColumn};

const RECORD_USAGE: &str = "record <customer> <water|electric> <meter> [YYYY-MM-DD]";
const DELETE_USAGE: &str = "delete-reading <reading-id>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "record",
            "Record a meter reading (date defaults to today)",
            RECORD_USAGE,
            cmd_record,
        ),
        CommandEntry::new(
            "delete-reading",
            "Delete one reading by id or id prefix",
            DELETE_USAGE,
            cmd_delete_reading,
        ),
        CommandEntry::new(
            "history",
            "List readings, newest first",
            "history [customer]",
            cmd_history,
        ),
        CommandEntry::new(
            "clear-history",
            "Delete every reading but keep customers",
            "clear-history",
            cmd_clear_history,
        ),
    ]
}

fn cmd_record(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [reference, kind, meter, rest @ ..] = args else {
        return Err(CommandError::usage(RECORD_USAGE));
    };
    let customer = context.resolve_customer(reference)?;
    let kind = parse_kind(kind)?;
    let meter = parse_amount(meter, "meter")?;
    let date = match rest.first() {
        Some(value) => parse_date(value)?,
        None => context.today(),
    };
    context.apply(StoreCommand::RecordReading {
        customer_id: customer.id,
        kind,
        meter,
        date,
    })?;
    output::success(format!(
        "Recorded {} reading {} for `{}` on {}.",
        kind.key(),
        meter,
        customer.name,
        context.formatters.date(date)
    ));
    Ok(())
}

fn cmd_delete_reading(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(reference) = args.first() else {
        return Err(CommandError::usage(DELETE_USAGE));
    };
    let entry = find_reading(context, reference)?;
    let reading = entry.reading;
    let prompt = format!(
        "Delete {} reading {} of `{}` from {}?",
        reading.kind.key(),
        reading.meter,
        entry.customer_name,
        reading.date
    );
    if !context.confirm(&prompt)? {
        output::info("Nothing deleted.");
        return Ok(());
    }
    context.apply(StoreCommand::DeleteReading {
        customer_id: reading.customer_id,
        kind: reading.kind,
        reading_id: reading.id,
    })?;
    output::success(format!("Reading {} deleted.", short_id(reading.id)));
    Ok(())
}

fn cmd_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let filter = match args.first() {
        Some(reference) => Some(context.resolve_customer(reference)?.id),
        None => None,
    };
    let entries = ReadingService::history(&context.store, filter);
    if entries.is_empty() {
        output::info("No readings recorded.");
        return Ok(());
    }
    output::section("Reading history");
    let mut table = Table::new(vec![
        TableColumn::left("Date"),
        TableColumn::left("Customer").max_width(28),
        TableColumn::left("Address").max_width(32),
        TableColumn::left("Type"),
        TableColumn::right("Meter"),
        TableColumn::left("Id"),
    ]);
    for entry in &entries {
        table.push(vec![
            context.formatters.date(entry.reading.date),
            entry.customer_name.clone(),
            entry.customer_address.clone().unwrap_or_else(|| "-".into()),
            entry.reading.kind.to_string(),
            context.formatters.usage(entry.reading.meter),
            short_id(entry.reading.id),
        ]);
    }
    output::block(table.render());
    Ok(())
}

fn cmd_clear_history(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let count = context.store.reading_count();
    if count == 0 {
        output::info("No readings to clear.");
        return Ok(());
    }
    if !context.confirm(&format!("Delete all {} readings?", count))? {
        output::info("History kept.");
        return Ok(());
    }
    if let CommandOutcome::HistoryCleared { removed } = context.apply(StoreCommand::ClearHistory)? {
        output::success(format!("Cleared {} reading(s).", removed));
    }
    Ok(())
}

/// Full id, or an unambiguous prefix of at least four characters.
fn find_reading(context: &ShellContext, reference: &str) -> Result<HistoryEntry, CommandError> {
    let needle = reference.trim().to_ascii_lowercase();
    let exact = Uuid::parse_str(&needle).ok();
    if exact.is_none() && needle.len() < 4 {
        return Err(CommandError::InvalidArguments(
            "reading ids need at least 4 characters".into(),
        ));
    }
    let mut matches: Vec<HistoryEntry> = ReadingService::history(&context.store, None)
        .into_iter()
        .filter(|entry| match exact {
            Some(id) => entry.reading.id == id,
            None => entry.reading.id.simple().to_string().starts_with(&needle),
        })
        .collect();
    match matches.len() {
        0 => Err(CommandError::InvalidArguments(format!(
            "no reading matches `{}`; see `history` for ids",
            reference
        ))),
        1 => Ok(matches.remove(0)),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{}` matches {} readings; use more characters",
            reference,
            matches.len()
        ))),
    }
}
