use meterbook_core::{CustomerUsage, SummaryService};
use meterbook_domain::{PeriodKind, UtilityKind};

use crate::cli::core::{parse_date, CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{ActivePeriod, ShellContext};
use crate::cli::table::{Table, TableColumn};

const PERIOD_USAGE: &str =
    "period [current_month|last_month|last_3_months|last_6_months|custom [start] [end]]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "period",
            "Show or change the billing period",
            PERIOD_USAGE,
            cmd_period,
        ),
        CommandEntry::new(
            "usage",
            "Show one customer's usage and charges for the period",
            "usage <customer>",
            cmd_usage,
        ),
        CommandEntry::new(
            "summary",
            "Bill every customer for the period",
            "summary",
            cmd_summary,
        ),
    ]
}

fn cmd_period(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(key) = args.first() {
        let kind = PeriodKind::from_key(key);
        if kind.key() != key.trim().to_ascii_lowercase() {
            output::warning(format!("Unknown period `{}`; using current month.", key));
        }
        let mut period = ActivePeriod {
            kind,
            ..ActivePeriod::default()
        };
        if kind == PeriodKind::Custom {
            period.custom_start = args.get(1).map(|value| parse_date(value)).transpose()?;
            period.custom_end = args.get(2).map(|value| parse_date(value)).transpose()?;
        } else if args.len() > 1 {
            return Err(CommandError::InvalidArguments(
                "only `custom` takes start and end dates".into(),
            ));
        }
        context.period = period;
    }
    let range = context.active_range();
    output::info(format!(
        "Period: {} ({})",
        context.period.kind.label(),
        context.formatters.range(&range)
    ));
    if range.is_inverted() {
        output::warning("Start is after end; usage will be zero.");
    }
    Ok(())
}

fn cmd_usage(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(reference) = args.first() else {
        return Err(CommandError::usage("usage <customer>"));
    };
    let customer = context.resolve_customer(reference)?;
    let range = context.active_range();
    let usage = SummaryService::customer_usage(&context.store, customer.id, range)?;
    output::section(format!(
        "{}: {} ({})",
        customer.name,
        context.period.kind.label(),
        context.formatters.range(&range)
    ));
    output::block(render_usage_card(context, &usage));
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let range = context.active_range();
    let result = SummaryService::summarize_store(&context.store, range);
    output::section(format!(
        "Summary: {} ({})",
        context.period.kind.label(),
        context.formatters.range(&range)
    ));
    if result.per_customer.is_empty() {
        output::info("No customers yet.");
        return Ok(());
    }
    let fmt = &context.formatters;
    let mut table = Table::new(vec![
        TableColumn::left("Customer").max_width(28),
        TableColumn::right("Water"),
        TableColumn::right("Water cost"),
        TableColumn::right("Electric"),
        TableColumn::right("Electric cost"),
        TableColumn::right("Total"),
    ]);
    for row in &result.per_customer {
        table.push(vec![
            row.name.clone(),
            fmt.usage(row.water.usage),
            fmt.money(row.water.cost),
            fmt.usage(row.electric.usage),
            fmt.money(row.electric.cost),
            fmt.money(row.total_cost),
        ]);
    }
    output::block(table.render());
    output::info(format!(
        "Water used: {}  Electric used: {}  Grand total: {}",
        fmt.usage(result.totals.water_usage),
        fmt.usage(result.totals.electric_usage),
        fmt.money(result.totals.grand_total)
    ));
    Ok(())
}

pub(crate) fn render_usage_card(context: &ShellContext, usage: &CustomerUsage) -> String {
    let fmt = &context.formatters;
    let mut lines = Vec::new();
    for kind in UtilityKind::ALL {
        let charge = usage.charge(kind);
        let tariff = context.store.settings.tariff(kind);
        lines.push(format!(
            "  {:<9} {:>10} units  {:>12}  (base {} + {} per unit)",
            kind.to_string(),
            fmt.usage(charge.usage),
            fmt.money(charge.cost),
            fmt.money(tariff.base_fee),
            fmt.money(tariff.unit_rate)
        ));
    }
    lines.push(format!("  {:<9} {:>30}", "Total", fmt.money(usage.total_cost)));
    lines.join("\n")
}
