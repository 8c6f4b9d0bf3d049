//! Applies the usage and tariff calculators across customers.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use meterbook_domain::{
    Customer, DateRange, MeterData, MeterStore, TariffSettings, UtilityKind,
};

use crate::{tariff::TariffExt, usage::usage_for_period, CoreError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
/// Consumption and its price for one utility.
pub struct UtilityCharge {
    pub usage: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Billing figures for one customer over a range.
pub struct CustomerUsage {
    pub customer_id: Uuid,
    pub name: String,
    pub water: UtilityCharge,
    pub electric: UtilityCharge,
    pub total_cost: f64,
}

impl CustomerUsage {
    pub fn charge(&self, kind: UtilityKind) -> UtilityCharge {
        match kind {
            UtilityKind::Water => self.water,
            UtilityKind::Electric => self.electric,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
/// Running totals across every customer in a summary.
pub struct AggregateTotals {
    pub water_usage: f64,
    pub electric_usage: f64,
    pub grand_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Complete summary for a range: one record per customer plus totals.
pub struct AggregateResult {
    pub range: DateRange,
    pub per_customer: Vec<CustomerUsage>,
    pub totals: AggregateTotals,
}

pub struct SummaryService;

impl SummaryService {
    /// Prices every customer for `range`, in the order of `customers`.
    ///
    /// Customers without readings still produce a record charged both base
    /// fees. Nothing is cached between calls.
    pub fn summarize(
        customers: &[Customer],
        readings: &MeterData,
        range: DateRange,
        settings: &TariffSettings,
    ) -> AggregateResult {
        let mut totals = AggregateTotals::default();
        let per_customer: Vec<CustomerUsage> = customers
            .iter()
            .map(|customer| {
                let usage = Self::price_customer(customer, readings, &range, settings);
                totals.water_usage += usage.water.usage;
                totals.electric_usage += usage.electric.usage;
                totals.grand_total += usage.total_cost;
                usage
            })
            .collect();
        debug!(
            customers = per_customer.len(),
            range = %range,
            grand_total = totals.grand_total,
            "summarized period"
        );
        AggregateResult {
            range,
            per_customer,
            totals,
        }
    }

    /// Convenience wrapper over [`SummaryService::summarize`] for a whole store.
    pub fn summarize_store(store: &MeterStore, range: DateRange) -> AggregateResult {
        Self::summarize(&store.customers, &store.meter_data, range, &store.settings)
    }

    /// Billing card for a single customer.
    pub fn customer_usage(
        store: &MeterStore,
        customer_id: Uuid,
        range: DateRange,
    ) -> Result<CustomerUsage, CoreError> {
        let customer = store
            .customer(customer_id)
            .ok_or(CoreError::CustomerNotFound(customer_id))?;
        Ok(Self::price_customer(
            customer,
            &store.meter_data,
            &range,
            &store.settings,
        ))
    }

    fn price_customer(
        customer: &Customer,
        readings: &MeterData,
        range: &DateRange,
        settings: &TariffSettings,
    ) -> CustomerUsage {
        let history = readings.get(&customer.id);
        let charge = |kind: UtilityKind| {
            let usage = history
                .map(|history| usage_for_period(history.readings(kind), range))
                .unwrap_or(0.0);
            UtilityCharge {
                usage,
                cost: settings.tariff(kind).cost(usage),
            }
        };
        let water = charge(UtilityKind::Water);
        let electric = charge(UtilityKind::Electric);
        CustomerUsage {
            customer_id: customer.id,
            name: customer.name.clone(),
            water,
            electric,
            total_cost: water.cost + electric.cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use meterbook_domain::Reading;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january() -> DateRange {
        DateRange::new(date(2024, 1, 1), date(2024, 1, 31))
    }

    #[test]
    fn customer_without_readings_pays_both_base_fees() {
        let mut store = MeterStore::new();
        store.customers.push(Customer::new("Empty"));

        let result = SummaryService::summarize_store(&store, january());

        assert_eq!(result.per_customer.len(), 1);
        let record = &result.per_customer[0];
        assert_eq!(record.water, UtilityCharge { usage: 0.0, cost: 8.50 });
        assert_eq!(record.electric, UtilityCharge { usage: 0.0, cost: 38.22 });
        assert!((result.totals.grand_total - store.settings.total_base_fee()).abs() < 1e-9);
    }

    #[test]
    fn totals_accumulate_in_customer_order() {
        let mut store = MeterStore::new();
        let first = Customer::new("First");
        let second = Customer::new("Second");
        let (first_id, second_id) = (first.id, second.id);
        store.customers.push(first);
        store.customers.push(second);
        for (id, start, end) in [(first_id, 10.0, 13.0), (second_id, 50.0, 52.0)] {
            let history = store.history_entry(id);
            history.insert(Reading::new(id, UtilityKind::Water, start, date(2023, 12, 31)));
            history.insert(Reading::new(id, UtilityKind::Water, end, date(2024, 1, 31)));
        }
        let history = store.history_entry(second_id);
        history.insert(Reading::new(second_id, UtilityKind::Electric, 100.0, date(2024, 1, 1)));
        history.insert(Reading::new(second_id, UtilityKind::Electric, 150.0, date(2024, 1, 20)));

        let result = SummaryService::summarize_store(&store, january());

        let names: Vec<&str> = result.per_customer.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
        assert_eq!(result.totals.water_usage, 5.0);
        assert_eq!(result.totals.electric_usage, 50.0);
        let expected = (8.50 + 3.0 * 18.0 + 38.22) + (8.50 + 2.0 * 18.0 + 38.22 + 50.0 * 4.18);
        assert!((result.totals.grand_total - expected).abs() < 1e-9);
    }

    #[test]
    fn customer_usage_rejects_unknown_customer() {
        let store = MeterStore::new();
        let err = SummaryService::customer_usage(&store, Uuid::new_v4(), january())
            .expect_err("unknown customer");
        assert!(matches!(err, CoreError::CustomerNotFound(_)));
    }

    #[test]
    fn rate_change_reprices_past_periods() {
        let mut store = MeterStore::new();
        let customer = Customer::new("Retro");
        let id = customer.id;
        store.customers.push(customer);
        let history = store.history_entry(id);
        history.insert(Reading::new(id, UtilityKind::Water, 0.0, date(2024, 1, 1)));
        history.insert(Reading::new(id, UtilityKind::Water, 10.0, date(2024, 1, 31)));

        let before = SummaryService::customer_usage(&store, id, january()).unwrap();
        store.settings.water_unit_rate = 20.0;
        let after = SummaryService::customer_usage(&store, id, january()).unwrap();

        assert!((before.water.cost - 188.50).abs() < 1e-9);
        assert!((after.water.cost - 208.50).abs() < 1e-9);
    }
}
