//! Shared runtime state for CLI interactions and command execution.

use std::sync::Arc;

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;

use meterbook_config::{Config, ConfigManager};
use meterbook_core::{resolve_period, Clock};
use meterbook_domain::{DateRange, MeterStore, PeriodKind};
use meterbook_storage_json::JsonStoreStorage;

use super::{formatters::CliFormatters, registry::CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// The billing period reports are computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivePeriod {
    pub kind: PeriodKind,
    pub custom_start: Option<NaiveDate>,
    pub custom_end: Option<NaiveDate>,
}

impl ActivePeriod {
    pub fn from_key(key: &str) -> Self {
        Self {
            kind: PeriodKind::from_key(key),
            ..Self::default()
        }
    }

    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        resolve_period(self.kind, today, self.custom_start, self.custom_end)
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub store: MeterStore,
    pub storage: JsonStoreStorage,
    pub clock: Arc<dyn Clock>,
    pub formatters: CliFormatters,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub theme: ColorfulTheme,
    pub period: ActivePeriod,
    pub running: bool,
}

impl ShellContext {
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn active_range(&self) -> DateRange {
        self.period.resolve(self.today())
    }

    pub fn prompt(&self) -> String {
        format!("meterbook [{}]> ", self.period.kind.label())
    }
}
