pub mod commands;
pub mod core;
pub mod formatters;
pub mod help;
pub mod output;
pub mod registry;
pub mod shell;
pub mod shell_context;
pub mod system_clock;
pub mod table;

pub use self::core::{process_script, CommandError, CommandResult, LoopControl};
pub use shell::{run_cli, SCRIPT_ENV_VAR};
pub use shell_context::{ActivePeriod, CliMode, ShellContext};
