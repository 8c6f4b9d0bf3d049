//! Explicit dispatch of store mutations, keyed by action and target id.
//!
//! Presentation layers build a [`StoreCommand`] and hand it here instead of
//! mutating the store themselves.

use chrono::NaiveDate;
use uuid::Uuid;

use meterbook_domain::{MeterStore, Tariff, TariffSettings, UtilityKind};

use crate::{
    customer_service::{CustomerDraft, CustomerService},
    reading_service::ReadingService,
    settings_service::SettingsService,
    time::Clock,
    CoreError,
};

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCommand {
    AddCustomer(CustomerDraft),
    EditCustomer {
        id: Uuid,
        draft: CustomerDraft,
    },
    RemoveCustomer(Uuid),
    RecordReading {
        customer_id: Uuid,
        kind: UtilityKind,
        meter: f64,
        date: NaiveDate,
    },
    DeleteReading {
        customer_id: Uuid,
        kind: UtilityKind,
        reading_id: Uuid,
    },
    ClearHistory,
    UpdateSettings(TariffSettings),
    SetTariff {
        kind: UtilityKind,
        tariff: Tariff,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What a successfully applied command changed.
pub enum CommandOutcome {
    CustomerAdded(Uuid),
    CustomerUpdated(Uuid),
    CustomerRemoved { id: Uuid, name: String },
    ReadingRecorded(Uuid),
    ReadingDeleted(Uuid),
    HistoryCleared { removed: usize },
    SettingsUpdated,
}

impl StoreCommand {
    /// Short action name, used for logging.
    pub fn action(&self) -> &'static str {
        match self {
            StoreCommand::AddCustomer(_) => "add_customer",
            StoreCommand::EditCustomer { .. } => "edit_customer",
            StoreCommand::RemoveCustomer(_) => "remove_customer",
            StoreCommand::RecordReading { .. } => "record_reading",
            StoreCommand::DeleteReading { .. } => "delete_reading",
            StoreCommand::ClearHistory => "clear_history",
            StoreCommand::UpdateSettings(_) => "update_settings",
            StoreCommand::SetTariff { .. } => "set_tariff",
        }
    }

    pub fn apply(self, store: &mut MeterStore, clock: &dyn Clock) -> Result<CommandOutcome, CoreError> {
        tracing::debug!(action = self.action(), "applying store command");
        match self {
            StoreCommand::AddCustomer(draft) => {
                CustomerService::add(store, draft, clock.now()).map(CommandOutcome::CustomerAdded)
            }
            StoreCommand::EditCustomer { id, draft } => {
                CustomerService::edit(store, id, draft)?;
                Ok(CommandOutcome::CustomerUpdated(id))
            }
            StoreCommand::RemoveCustomer(id) => {
                let removed = CustomerService::remove(store, id)?;
                Ok(CommandOutcome::CustomerRemoved {
                    id,
                    name: removed.name,
                })
            }
            StoreCommand::RecordReading {
                customer_id,
                kind,
                meter,
                date,
            } => ReadingService::record(store, customer_id, kind, meter, date)
                .map(CommandOutcome::ReadingRecorded),
            StoreCommand::DeleteReading {
                customer_id,
                kind,
                reading_id,
            } => {
                ReadingService::delete(store, customer_id, kind, reading_id)?;
                Ok(CommandOutcome::ReadingDeleted(reading_id))
            }
            StoreCommand::ClearHistory => Ok(CommandOutcome::HistoryCleared {
                removed: ReadingService::clear_history(store),
            }),
            StoreCommand::UpdateSettings(settings) => {
                SettingsService::update(store, settings)?;
                Ok(CommandOutcome::SettingsUpdated)
            }
            StoreCommand::SetTariff { kind, tariff } => {
                SettingsService::set_tariff(store, kind, tariff)?;
                Ok(CommandOutcome::SettingsUpdated)
            }
        }
    }
}
