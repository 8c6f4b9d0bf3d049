//! Recording, deleting, and listing meter readings.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use meterbook_domain::{MeterStore, Reading, UtilityKind};

use crate::CoreError;

/// A reading joined with the customer it belongs to, for history views.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryEntry {
    pub reading: Reading,
    pub customer_name: String,
    pub customer_address: Option<String>,
}

/// Provides validated mutations and queries for [`Reading`] entities.
pub struct ReadingService;

impl ReadingService {
    /// Records a new reading and keeps the customer's partition date-ordered.
    pub fn record(
        store: &mut MeterStore,
        customer_id: Uuid,
        kind: UtilityKind,
        meter: f64,
        date: NaiveDate,
    ) -> Result<Uuid, CoreError> {
        if store.customer(customer_id).is_none() {
            return Err(CoreError::CustomerNotFound(customer_id));
        }
        Self::validate_meter(meter)?;
        let reading = Reading::new(customer_id, kind, meter, date);
        let id = reading.id;
        store.history_entry(customer_id).insert(reading);
        store.touch();
        info!(customer = %customer_id, %kind, meter, %date, "reading recorded");
        Ok(id)
    }

    pub fn delete(
        store: &mut MeterStore,
        customer_id: Uuid,
        kind: UtilityKind,
        reading_id: Uuid,
    ) -> Result<Reading, CoreError> {
        let removed = store
            .meter_data
            .get_mut(&customer_id)
            .and_then(|history| history.remove(kind, reading_id))
            .ok_or(CoreError::ReadingNotFound(reading_id))?;
        store.touch();
        debug!(reading = %reading_id, "reading deleted");
        Ok(removed)
    }

    /// Empties every customer's history. Customers and settings are kept.
    pub fn clear_history(store: &mut MeterStore) -> usize {
        let removed = store.reading_count();
        for history in store.meter_data.values_mut() {
            history.clear();
        }
        store.touch();
        info!(removed, "reading history cleared");
        removed
    }

    /// All readings, newest first, optionally limited to one customer.
    ///
    /// Readings whose customer no longer exists are skipped.
    pub fn history(store: &MeterStore, customer: Option<Uuid>) -> Vec<HistoryEntry> {
        let mut entries: Vec<HistoryEntry> = store
            .meter_data
            .iter()
            .filter(|(customer_id, _)| customer.map_or(true, |wanted| wanted == **customer_id))
            .filter_map(|(customer_id, history)| {
                store
                    .customer(*customer_id)
                    .map(|owner| (owner, history))
            })
            .flat_map(|(owner, history)| {
                history
                    .water
                    .iter()
                    .chain(history.electric.iter())
                    .map(move |reading| HistoryEntry {
                        reading: reading.clone(),
                        customer_name: owner.name.clone(),
                        customer_address: owner.address.clone(),
                    })
            })
            .collect();
        entries.sort_by(|a, b| b.reading.date.cmp(&a.reading.date));
        entries
    }

    pub fn latest(store: &MeterStore, customer_id: Uuid, kind: UtilityKind) -> Option<&Reading> {
        store
            .history(customer_id)
            .and_then(|history| history.latest(kind))
    }

    fn validate_meter(meter: f64) -> Result<(), CoreError> {
        if !meter.is_finite() {
            return Err(CoreError::Validation("meter value must be a number".into()));
        }
        if meter < 0.0 {
            return Err(CoreError::Validation(
                "meter value cannot be negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{CustomerDraft, CustomerService};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store_with(names: &[&str]) -> (MeterStore, Vec<Uuid>) {
        let mut store = MeterStore::new();
        let ids = names
            .iter()
            .map(|name| {
                CustomerService::add(&mut store, CustomerDraft::named(*name), Utc::now()).unwrap()
            })
            .collect();
        (store, ids)
    }

    #[test]
    fn record_requires_existing_customer() {
        let mut store = MeterStore::new();
        let err = ReadingService::record(
            &mut store,
            Uuid::new_v4(),
            UtilityKind::Water,
            1.0,
            date(2024, 1, 1),
        )
        .expect_err("unknown customer");
        assert!(matches!(err, CoreError::CustomerNotFound(_)));
    }

    #[test]
    fn record_rejects_negative_and_nan_meters() {
        let (mut store, ids) = store_with(&["Meter"]);
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let result =
                ReadingService::record(&mut store, ids[0], UtilityKind::Water, bad, date(2024, 1, 1));
            assert!(matches!(result, Err(CoreError::Validation(_))), "{bad}");
        }
        assert_eq!(store.reading_count(), 0);
    }

    #[test]
    fn record_out_of_order_keeps_dates_sorted() {
        let (mut store, ids) = store_with(&["Sorted"]);
        let id = ids[0];
        for (day, meter) in [(20, 30.0), (5, 10.0), (12, 20.0)] {
            ReadingService::record(&mut store, id, UtilityKind::Electric, meter, date(2024, 1, day))
                .unwrap();
        }
        let days: Vec<u32> = store
            .readings(id, UtilityKind::Electric)
            .iter()
            .map(|r| chrono::Datelike::day(&r.date))
            .collect();
        assert_eq!(days, vec![5, 12, 20]);
        assert_eq!(
            ReadingService::latest(&store, id, UtilityKind::Electric).map(|r| r.meter),
            Some(30.0)
        );
    }

    #[test]
    fn history_is_newest_first_and_filterable() {
        let (mut store, ids) = store_with(&["A", "B"]);
        ReadingService::record(&mut store, ids[0], UtilityKind::Water, 1.0, date(2024, 1, 1))
            .unwrap();
        ReadingService::record(&mut store, ids[1], UtilityKind::Water, 5.0, date(2024, 3, 1))
            .unwrap();
        ReadingService::record(&mut store, ids[0], UtilityKind::Electric, 9.0, date(2024, 2, 1))
            .unwrap();

        let all = ReadingService::history(&store, None);
        let dates: Vec<NaiveDate> = all.iter().map(|entry| entry.reading.date).collect();
        assert_eq!(dates, vec![date(2024, 3, 1), date(2024, 2, 1), date(2024, 1, 1)]);

        let only_a = ReadingService::history(&store, Some(ids[0]));
        assert_eq!(only_a.len(), 2);
        assert!(only_a.iter().all(|entry| entry.customer_name == "A"));
    }

    #[test]
    fn history_skips_orphaned_readings() {
        let (mut store, ids) = store_with(&["Kept"]);
        let ghost = Uuid::new_v4();
        store.history_entry(ghost).insert(Reading::new(
            ghost,
            UtilityKind::Water,
            3.0,
            date(2024, 1, 1),
        ));
        ReadingService::record(&mut store, ids[0], UtilityKind::Water, 1.0, date(2024, 1, 1))
            .unwrap();

        assert_eq!(ReadingService::history(&store, None).len(), 1);
    }

    #[test]
    fn clear_history_keeps_customers() {
        let (mut store, ids) = store_with(&["A", "B"]);
        ReadingService::record(&mut store, ids[0], UtilityKind::Water, 1.0, date(2024, 1, 1))
            .unwrap();
        ReadingService::record(&mut store, ids[1], UtilityKind::Electric, 2.0, date(2024, 1, 1))
            .unwrap();

        assert_eq!(ReadingService::clear_history(&mut store), 2);
        assert_eq!(store.reading_count(), 0);
        assert_eq!(store.customers.len(), 2);
    }
}
