//! The owned application state: customers, their meter histories, and tariffs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    common::{deserialize_id_map, find_by_id},
    customer::Customer,
    reading::{MeterHistory, Reading, UtilityKind},
    settings::TariffSettings,
};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Meter histories keyed by customer id.
pub type MeterData = BTreeMap<Uuid, MeterHistory>;

/// Everything the application tracks. Passed by reference to every service;
/// there is no global instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeterStore {
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default, deserialize_with = "deserialize_id_map")]
    pub meter_data: MeterData,
    #[serde(default)]
    pub settings: TariffSettings,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default = "MeterStore::schema_version_default")]
    pub schema_version: u8,
}

impl Default for MeterStore {
    fn default() -> Self {
        Self {
            customers: Vec::new(),
            meter_data: MeterData::new(),
            settings: TariffSettings::default(),
            updated_at: Utc::now(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }
}

impl MeterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn customer(&self, id: Uuid) -> Option<&Customer> {
        find_by_id(&self.customers, id)
    }

    pub fn customer_mut(&mut self, id: Uuid) -> Option<&mut Customer> {
        self.customers.iter_mut().find(|customer| customer.id == id)
    }

    pub fn history(&self, customer_id: Uuid) -> Option<&MeterHistory> {
        self.meter_data.get(&customer_id)
    }

    /// Returns the history for a customer, creating an empty one if needed.
    pub fn history_entry(&mut self, customer_id: Uuid) -> &mut MeterHistory {
        self.meter_data.entry(customer_id).or_default()
    }

    /// Readings of one utility for one customer; empty when none exist.
    pub fn readings(&self, customer_id: Uuid, kind: UtilityKind) -> &[Reading] {
        self.history(customer_id)
            .map(|history| history.readings(kind))
            .unwrap_or(&[])
    }

    pub fn reading_count(&self) -> usize {
        self.meter_data.values().map(MeterHistory::len).sum()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn readings_for_unknown_customer_are_empty() {
        let store = MeterStore::new();
        assert!(store.readings(Uuid::new_v4(), UtilityKind::Water).is_empty());
        assert_eq!(store.reading_count(), 0);
    }

    #[test]
    fn deserializes_payload_with_missing_sections() {
        let store: MeterStore = serde_json::from_str(r#"{"customers": []}"#).unwrap();
        assert!(store.meter_data.is_empty());
        assert_eq!(store.settings, TariffSettings::default());
        assert_eq!(store.schema_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn history_entry_creates_partition_on_demand() {
        let mut store = MeterStore::new();
        let customer = Customer::new("Anan");
        let id = customer.id;
        store.customers.push(customer);
        store.history_entry(id).insert(Reading::new(
            id,
            UtilityKind::Water,
            12.0,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        ));

        assert_eq!(store.readings(id, UtilityKind::Water).len(), 1);
        assert_eq!(store.reading_count(), 1);
        assert_eq!(store.customer(id).map(|c| c.name.as_str()), Some("Anan"));
    }
}
