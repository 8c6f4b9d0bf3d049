//! Dispatch, error reporting, and the shared helpers command handlers lean on.

use std::{io, path::PathBuf, sync::Arc};

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use strsim::levenshtein;
use tracing::{info, warn};

use meterbook_config::{default_base_dir, ConfigError, ConfigManager};
use meterbook_core::{
    storage::{store_warnings, StoreStorage},
    Clock, CommandOutcome, CoreError, CustomerService, PullOutcome, StoreCommand, SyncService,
};
use meterbook_domain::{Customer, MeterStore, UtilityKind};
use meterbook_storage_json::{JsonStoreStorage, StoragePaths};

use super::{
    commands,
    formatters::CliFormatters,
    output,
    registry::{CommandEntry, CommandRegistry},
    shell::parse_command_line,
    shell_context::{ActivePeriod, CliMode, ShellContext},
    system_clock::SystemClock,
};
use crate::{errors::CliError, sync::HttpSyncTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl CommandError {
    pub(crate) fn usage(usage: &str) -> Self {
        CommandError::InvalidArguments(format!("usage: {}", usage))
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, default_base_dir(), Arc::new(SystemClock))
    }

    /// Builds a context rooted at `base`, loading config and the saved store.
    pub fn with_base_dir(
        mode: CliMode,
        base: PathBuf,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        output::apply_config(&config);
        let paths = StoragePaths::under(config.resolve_data_root(&base));
        let storage = JsonStoreStorage::with_retention(paths, config.backup_retention)?;
        let store = storage.load_or_default()?;
        info!(
            path = %storage.store_path().display(),
            customers = store.customers.len(),
            readings = store.reading_count(),
            "store loaded"
        );

        let mut context = ShellContext {
            mode,
            registry,
            store,
            storage,
            clock,
            formatters: CliFormatters::new(&config),
            period: ActivePeriod::from_key(&config.default_period),
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            running: true,
        };
        context.report_store_warnings();
        context.auto_pull();
        Ok(context)
    }

    fn auto_pull(&mut self) {
        if !self.config.auto_pull {
            return;
        }
        let Some(url) = self.config.sync_url.clone() else {
            return;
        };
        let transport = HttpSyncTransport::new(url);
        match self.pull_remote(&transport) {
            Ok(PullOutcome::Merged(keys)) => {
                output::info(format!("Pulled remote data ({}).", keys.join(", ")));
            }
            Ok(PullOutcome::Empty) => {}
            Err(err) => {
                warn!(error = %err, "automatic pull failed");
                output::warning(format!("Automatic pull failed: {}", err));
            }
        }
    }

    /// Tokenizes and runs one command line.
    pub fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };

        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        self.confirm("Exit shell?").map_err(CliError::from)
    }

    /// Asks for confirmation; script mode always answers yes.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(CommandError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(CoreError::CustomerNotFound(id)) => {
                output::error(format!("Customer {} not found.", id));
                output::hint("Use `customers` to list customers.");
            }
            CommandError::Core(CoreError::Sync(message)) => {
                output::error(format!("Sync failed: {}", message));
            }
            other => output::error(other),
        }
        Ok(())
    }

    /// Free text input; only available interactively.
    pub(crate) fn prompt_text(
        &self,
        prompt: &str,
        initial: Option<&str>,
    ) -> Result<String, CommandError> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(value) = initial {
            input = input.with_initial_text(value);
        }
        input.interact_text().map_err(CommandError::from)
    }

    /// Applies a mutation to a copy of the store and keeps it only once it is saved.
    pub(crate) fn apply(&mut self, command: StoreCommand) -> Result<CommandOutcome, CommandError> {
        let mut next = self.store.clone();
        let outcome = command.apply(&mut next, self.clock.as_ref())?;
        self.commit_store(next)?;
        Ok(outcome)
    }

    /// Saves `next` and makes it the current store. On failure the current store is untouched.
    pub(crate) fn commit_store(&mut self, next: MeterStore) -> Result<(), CommandError> {
        self.storage.save_store(&next)?;
        self.store = next;
        Ok(())
    }

    /// Pulls remote data into a copy of the store and commits it when anything was merged.
    pub(crate) fn pull_remote(
        &mut self,
        transport: &HttpSyncTransport,
    ) -> Result<PullOutcome, CommandError> {
        let mut next = self.store.clone();
        let outcome = SyncService::pull(transport, &mut next)?;
        if let PullOutcome::Merged(_) = outcome {
            self.commit_store(next)?;
        }
        Ok(outcome)
    }

    pub(crate) fn persist_config(&mut self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        output::apply_config(&self.config);
        self.formatters = CliFormatters::new(&self.config);
        Ok(())
    }

    pub(crate) fn resolve_customer(&self, reference: &str) -> Result<Customer, CommandError> {
        CustomerService::find(&self.store, reference)
            .cloned()
            .map_err(CommandError::from)
    }

    pub(crate) fn sync_transport(&self) -> Result<HttpSyncTransport, CommandError> {
        self.config
            .sync_url
            .as_deref()
            .map(HttpSyncTransport::new)
            .ok_or_else(|| {
                CommandError::InvalidArguments(
                    "No sync URL configured. Use `sync-url <url>` first.".into(),
                )
            })
    }

    pub(crate) fn report_store_warnings(&self) -> usize {
        let warnings = store_warnings(&self.store);
        for warning in &warnings {
            output::warning(warning);
        }
        warnings.len()
    }
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

pub(crate) fn parse_amount(input: &str, what: &str) -> Result<f64, CommandError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!("{} must be a number, got `{}`", what, input))
        })
}

pub(crate) fn parse_kind(input: &str) -> Result<UtilityKind, CommandError> {
    input
        .parse::<UtilityKind>()
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

/// Runs `lines` against a fresh script-mode context rooted at `base`.
pub fn process_script(
    base: PathBuf,
    clock: Arc<dyn Clock>,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let mut context = ShellContext::with_base_dir(CliMode::Script, base, clock)?;
    for line in lines {
        match context.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(context)
}
