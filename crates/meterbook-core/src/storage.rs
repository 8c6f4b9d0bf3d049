use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use meterbook_domain::{MeterStore, UtilityKind};

use crate::CoreError;

/// Describes a persisted backup artifact for the store.
#[derive(Debug, Clone)]
pub struct StoreBackupInfo {
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Abstraction over persistence backends capable of storing the meter store and backups.
pub trait StoreStorage: Send + Sync {
    fn save_store(&self, store: &MeterStore) -> Result<(), CoreError>;
    fn load_store(&self) -> Result<MeterStore, CoreError>;
    fn store_exists(&self) -> bool;
    fn store_path(&self) -> &Path;
    fn list_backups(&self) -> Result<Vec<StoreBackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &StoreBackupInfo) -> Result<MeterStore, CoreError>;

    /// Loads the persisted store, or an empty one when nothing was saved yet.
    fn load_or_default(&self) -> Result<MeterStore, CoreError> {
        if self.store_exists() {
            self.load_store()
        } else {
            Ok(MeterStore::default())
        }
    }
}

/// Detects dangling references and other anomalies within a store snapshot.
pub fn store_warnings(store: &MeterStore) -> Vec<String> {
    let customer_ids: HashSet<_> = store.customers.iter().map(|c| c.id).collect();
    let mut warnings = Vec::new();

    for (customer_id, history) in &store.meter_data {
        if !customer_ids.contains(customer_id) {
            warnings.push(format!(
                "meter history {} has no matching customer ({} readings)",
                customer_id,
                history.len()
            ));
        }
        for kind in UtilityKind::ALL {
            for reading in history.readings(kind) {
                if reading.customer_id != *customer_id {
                    warnings.push(format!(
                        "reading {} is filed under customer {} but references {}",
                        reading.id, customer_id, reading.customer_id
                    ));
                }
                if reading.kind != kind {
                    warnings.push(format!(
                        "reading {} is a {} reading stored with {} readings",
                        reading.id,
                        reading.kind.key(),
                        kind.key()
                    ));
                }
            }
        }
        if !history.is_sorted() {
            warnings.push(format!(
                "readings of customer {} are not in date order",
                customer_id
            ));
        }
    }
    warnings
}
