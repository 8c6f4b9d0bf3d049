pub mod customer;
pub mod reading;
pub mod report;
pub mod settings;
pub mod sync;
pub mod system;

use crate::cli::registry::{CommandGroup, CommandRegistry};

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    registry.register_group(CommandGroup::Customers, customer::definitions());
    registry.register_group(CommandGroup::Readings, reading::definitions());
    registry.register_group(CommandGroup::Billing, report::definitions());
    registry.register_group(CommandGroup::Settings, settings::definitions());
    registry.register_group(CommandGroup::Sync, sync::definitions());
    registry.register_group(CommandGroup::Session, system::definitions());
}
