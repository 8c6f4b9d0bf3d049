use meterbook_core::{CommandOutcome, CustomerDraft, CustomerService, ReadingService, StoreCommand};
use meterbook_domain::{Customer, UtilityKind};

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::formatters::short_id;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{CliMode, ShellContext};
use crate::cli::table::{Table, TableColumn};

const ADD_USAGE: &str = "add-customer <name> [address] [phone] [note]";
const EDIT_USAGE: &str = "edit-customer <customer> <name> [address|-] [phone|-] [note|-]";
const REMOVE_USAGE: &str = "remove-customer <customer>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("customers", "List customers", "customers", cmd_customers),
        CommandEntry::new("add-customer", "Add a customer", ADD_USAGE, cmd_add_customer),
        CommandEntry::new(
            "edit-customer",
            "Change a customer's details",
            EDIT_USAGE,
            cmd_edit_customer,
        ),
        CommandEntry::new(
            "remove-customer",
            "Remove a customer and all of its readings",
            REMOVE_USAGE,
            cmd_remove_customer,
        ),
    ]
}

fn cmd_customers(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let customers = CustomerService::list(&context.store);
    if customers.is_empty() {
        output::info("No customers yet. Use `add-customer <name>` to create one.");
        return Ok(());
    }
    output::section("Customers");
    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Name").max_width(28),
        TableColumn::left("Address").max_width(32),
        TableColumn::left("Phone"),
        TableColumn::right("Last water"),
        TableColumn::right("Last electric"),
        TableColumn::left("Note").max_width(32),
        TableColumn::left("Id"),
    ]);
    for (index, customer) in customers.iter().enumerate() {
        let last = |kind| {
            ReadingService::latest(&context.store, customer.id, kind)
                .map_or_else(|| "-".to_string(), |reading| context.formatters.usage(reading.meter))
        };
        table.push(vec![
            (index + 1).to_string(),
            customer.name.clone(),
            customer.address.clone().unwrap_or_default(),
            customer.phone.clone().unwrap_or_default(),
            last(UtilityKind::Water),
            last(UtilityKind::Electric),
            customer.note.clone().unwrap_or_default(),
            short_id(customer.id),
        ]);
    }
    output::block(table.render());
    Ok(())
}

fn cmd_add_customer(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = match args {
        [] if context.mode == CliMode::Interactive => prompt_draft(context, None)?,
        [] => return Err(CommandError::usage(ADD_USAGE)),
        [name, rest @ ..] => CustomerDraft {
            name: name.to_string(),
            address: rest.first().map(|value| value.to_string()),
            phone: rest.get(1).map(|value| value.to_string()),
            note: rest.get(2).map(|value| value.to_string()),
        },
    };
    if let CommandOutcome::CustomerAdded(id) = context.apply(StoreCommand::AddCustomer(draft))? {
        let name = context
            .store
            .customer(id)
            .map(|customer| customer.name.clone())
            .unwrap_or_default();
        output::success(format!("Customer `{}` added ({}).", name, short_id(id)));
    }
    Ok(())
}

fn cmd_edit_customer(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(reference) = args.first() else {
        return Err(CommandError::usage(EDIT_USAGE));
    };
    let existing = context.resolve_customer(reference)?;
    let draft = match &args[1..] {
        [] if context.mode == CliMode::Interactive => prompt_draft(context, Some(&existing))?,
        [] => return Err(CommandError::usage(EDIT_USAGE)),
        [name, rest @ ..] => CustomerDraft {
            name: name.to_string(),
            address: merge_field(rest.first(), &existing.address),
            phone: merge_field(rest.get(1), &existing.phone),
            note: merge_field(rest.get(2), &existing.note),
        },
    };
    context.apply(StoreCommand::EditCustomer {
        id: existing.id,
        draft,
    })?;
    output::success(format!("Customer `{}` updated.", existing.name));
    Ok(())
}

fn cmd_remove_customer(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(reference) = args.first() else {
        return Err(CommandError::usage(REMOVE_USAGE));
    };
    let customer = context.resolve_customer(reference)?;
    let readings = context
        .store
        .history(customer.id)
        .map_or(0, |history| history.len());
    let prompt = format!(
        "Remove `{}` and its {} reading(s)?",
        customer.name, readings
    );
    if !context.confirm(&prompt)? {
        output::info("Nothing removed.");
        return Ok(());
    }
    if let CommandOutcome::CustomerRemoved { name, .. } =
        context.apply(StoreCommand::RemoveCustomer(customer.id))?
    {
        output::success(format!("Customer `{}` removed.", name));
    }
    Ok(())
}

/// A missing argument keeps the current value; `-` clears it.
fn merge_field(arg: Option<&&str>, current: &Option<String>) -> Option<String> {
    match arg {
        Some(&"-") => None,
        Some(value) => Some(value.to_string()),
        None => current.clone(),
    }
}

fn prompt_draft(
    context: &ShellContext,
    existing: Option<&Customer>,
) -> Result<CustomerDraft, CommandError> {
    let optional = |value: String| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };
    let name = context.prompt_text("Name", existing.map(|c| c.name.as_str()))?;
    let address = context.prompt_text("Address", existing.and_then(|c| c.address.as_deref()))?;
    let phone = context.prompt_text("Phone", existing.and_then(|c| c.phone.as_deref()))?;
    let note = context.prompt_text("Note", existing.and_then(|c| c.note.as_deref()))?;
    Ok(CustomerDraft {
        name,
        address: optional(address),
        phone: optional(phone),
        note: optional(note),
    })
}
