use meterbook_config::Theme;
use meterbook_core::{storage::StoreStorage, StoreCommand};
use meterbook_domain::{PeriodKind, Tariff, UtilityKind};

use crate::cli::core::{parse_amount, parse_kind, CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::cli::table::{Table, TableColumn};

const SET_RATE_USAGE: &str = "set-rate <water|electric> <base-fee> <unit-rate>";
const CONFIG_USAGE: &str = "config <currency_symbol|default_period|theme|color|backup_retention> <value>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "settings",
            "Show tariffs and preferences",
            "settings",
            cmd_settings,
        ),
        CommandEntry::new(
            "set-rate",
            "Change a utility's base fee and unit rate",
            SET_RATE_USAGE,
            cmd_set_rate,
        ),
        CommandEntry::new("config", "Change a preference", CONFIG_USAGE, cmd_config),
    ]
}

fn cmd_settings(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let fmt = &context.formatters;
    output::section("Tariffs");
    let mut table = Table::new(vec![
        TableColumn::left("Utility"),
        TableColumn::right("Base fee"),
        TableColumn::right("Unit rate"),
    ]);
    for kind in UtilityKind::ALL {
        let tariff = context.store.settings.tariff(kind);
        table.push(vec![
            kind.to_string(),
            fmt.money(tariff.base_fee),
            fmt.money(tariff.unit_rate),
        ]);
    }
    output::block(table.render());

    let config = &context.config;
    output::section("Preferences");
    output::block(format!("  Currency symbol : {}", config.currency_symbol));
    output::block(format!("  Default period  : {}", config.default_period));
    output::block(format!("  Theme           : {}", config.theme));
    output::block(format!(
        "  Color           : {}",
        if config.ui_color_enabled { "on" } else { "off" }
    ));
    output::block(format!(
        "  Sync URL        : {}",
        config.sync_url.as_deref().unwrap_or("(none)")
    ));
    output::block(format!(
        "  Auto pull       : {}",
        if config.auto_pull { "on" } else { "off" }
    ));
    output::block(format!("  Backups kept    : {}", config.backup_retention));
    output::block(format!(
        "  Store file      : {}",
        context.storage.store_path().display()
    ));
    Ok(())
}

fn cmd_set_rate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [kind, base_fee, unit_rate] = args else {
        return Err(CommandError::usage(SET_RATE_USAGE));
    };
    let kind = parse_kind(kind)?;
    let tariff = Tariff {
        base_fee: parse_amount(base_fee, "base fee")?,
        unit_rate: parse_amount(unit_rate, "unit rate")?,
    };
    context.apply(StoreCommand::SetTariff { kind, tariff })?;
    output::success(format!(
        "{} tariff set to base {} + {} per unit.",
        kind,
        context.formatters.money(tariff.base_fee),
        context.formatters.money(tariff.unit_rate)
    ));
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key, value] = args else {
        return Err(CommandError::usage(CONFIG_USAGE));
    };
    let config = &mut context.config;
    match key.to_ascii_lowercase().as_str() {
        "currency_symbol" => config.currency_symbol = value.to_string(),
        "default_period" => {
            let kind = PeriodKind::from_key(value);
            if kind.key() != value.to_ascii_lowercase() {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown period `{}`",
                    value
                )));
            }
            config.default_period = kind.key().to_string();
        }
        "theme" => config.theme = Theme::parse(value),
        "color" => config.ui_color_enabled = parse_switch(value)?,
        "backup_retention" => {
            config.backup_retention = value
                .parse::<usize>()
                .ok()
                .filter(|count| *count > 0)
                .ok_or_else(|| {
                    CommandError::InvalidArguments("backup_retention must be at least 1".into())
                })?;
            output::hint("The new retention applies from the next start.");
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{}`",
                other
            )))
        }
    }
    context.persist_config()?;
    output::success("Configuration updated.");
    Ok(())
}

pub(crate) fn parse_switch(value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(CommandError::InvalidArguments(format!(
            "expected on or off, got `{}`",
            value
        ))),
    }
}
